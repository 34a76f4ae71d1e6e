//! Reference-image access for the face similarity path.
//!
//! Upload and storage of the image itself is external plumbing; this
//! trait only fetches the bytes previously stored for a subject.

use crate::StoreError;
use vita_types::SubjectId;

pub trait ReferenceImageStore: Send + Sync {
    /// The subject's stored reference image. `NotFound` if none exists.
    fn get_reference(&self, subject: &SubjectId) -> Result<Vec<u8>, StoreError>;

    /// Store (or replace) the subject's reference image.
    fn put_reference(&self, subject: &SubjectId, image: &[u8]) -> Result<(), StoreError>;
}
