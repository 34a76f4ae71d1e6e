//! Property tests for the storage contracts the ceremonies lean on.

use proptest::prelude::*;

use vita_nullables::NullStore;
use vita_store::{ChallengeStore, CredentialStore};
use vita_types::{
    CeremonyPurpose, ChallengeKey, Credential, CredentialId, Modality, SubjectId, Timestamp,
    Transport,
};
use vita_verification::wire::AuthenticatorData;

fn credential(counter: u64) -> Credential {
    Credential {
        subject: SubjectId::new("subj-prop"),
        modality: Modality::FaceKey,
        credential_id: CredentialId::new(b"cred-prop".to_vec()),
        public_key: vita_crypto::keypair_from_seed(&[9; 32]).public,
        counter,
        transports: vec![Transport::Internal],
        enrolled_at: Timestamp::new(0),
    }
}

proptest! {
    /// The counter bump accepts exactly the strictly-greater reports.
    #[test]
    fn counter_bump_is_strictly_monotonic(stored in 0u64..1_000_000, reported in 0u64..1_000_000) {
        let store = NullStore::new();
        store.enroll(&credential(stored)).unwrap();

        let id = CredentialId::new(b"cred-prop".to_vec());
        let result = store.bump_counter(&id, reported);
        if reported > stored {
            prop_assert!(result.is_ok());
            prop_assert_eq!(store.get_by_id(&id).unwrap().counter, reported);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(store.get_by_id(&id).unwrap().counter, stored);
        }
    }

    /// A stored challenge is observable exactly once within its TTL.
    #[test]
    fn challenge_is_single_use(
        value in proptest::collection::vec(any::<u8>(), 32),
        elapsed in 0u64..600,
    ) {
        let store = NullStore::new();
        let key = ChallengeKey::new(
            SubjectId::new("subj-prop"),
            Modality::FaceKey,
            CeremonyPurpose::Authenticate,
        );
        let issued = Timestamp::new(1_000_000);
        store.put(&key, &value, 300, issued).unwrap();

        let first = store.consume(&key, issued.plus(elapsed));
        if elapsed < 300 {
            prop_assert_eq!(first.unwrap(), value);
        } else {
            prop_assert!(first.is_err());
        }
        // Consumed or expired, the second read never sees it.
        prop_assert!(store.consume(&key, issued.plus(elapsed)).is_err());
    }

    /// The 41-byte authenticator data encoding is lossless.
    #[test]
    fn authenticator_data_encoding_round_trips(flags in any::<u8>(), counter in any::<u64>()) {
        let data = AuthenticatorData::new("vita.example", flags, counter);
        let decoded = AuthenticatorData::from_bytes(&data.to_bytes()).unwrap();
        prop_assert_eq!(decoded, data);
    }
}
