//! Full-derivation protocol tests: these pay the real Argon2id cost.

use snip_core::{types::resolve_storage_path, SnipError, SnippetMetadata, SnippetModel, SnippetType, SpecVersion};
use snip_crypto::{decrypt_snippet, derive_address, encrypt_snippet, generate_stack};

const ADDRESS_SALT: &str = "test-deployment-salt";

fn hello_snippet(id: &str) -> SnippetModel {
    SnippetModel {
        metadata: SnippetMetadata {
            id: id.into(),
            language: "plaintext".into(),
            ephemeral: true,
        },
        data: "hello".into(),
    }
}

#[tokio::test]
async fn save_then_load_roundtrip() {
    let stack = generate_stack(true, ADDRESS_SALT).await.unwrap();
    let snippet = hello_snippet(&stack.identifier);

    let spec = encrypt_snippet(&stack, &snippet).unwrap();

    // Load path: only the identifier and the envelope survive.
    let version = SpecVersion::from_wire(&spec.version);
    let restored = decrypt_snippet(&spec, &stack.identifier, version).unwrap();

    assert_eq!(restored, snippet);
    assert_eq!(restored.data, "hello");
}

#[tokio::test]
async fn wrong_passphrase_is_an_authentication_failure() {
    let stack = generate_stack(true, ADDRESS_SALT).await.unwrap();
    let spec = encrypt_snippet(&stack, &hello_snippet(&stack.identifier)).unwrap();

    let err = decrypt_snippet(&spec, "WrongWords", SpecVersion::V2).unwrap_err();
    assert!(matches!(err, SnipError::Authentication));
}

#[test]
fn alice_bob_addressing_scenario() {
    let identifier = "AliceBob";
    assert_eq!(SnippetType::classify(identifier), SnippetType::Ephemeral);

    let address = derive_address(identifier, ADDRESS_SALT.as_bytes()).unwrap();
    let path = resolve_storage_path(identifier, &address).unwrap();
    assert_eq!(path, format!("ephemeral/{address}"));

    // Deterministic: a second client computes the same location.
    let again = derive_address(identifier, ADDRESS_SALT.as_bytes()).unwrap();
    assert_eq!(address, again);
}

#[test]
fn all_lowercase_identifier_never_reaches_derivation() {
    let err = resolve_storage_path("alicebob", "unused").unwrap_err();
    assert!(matches!(err, SnipError::Classification(0)));
}
