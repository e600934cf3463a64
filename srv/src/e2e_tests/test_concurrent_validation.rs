//! Test that validation from many threads agrees.

use std::sync::Arc;
use std::thread;

use crate::auth::{TokenAuthority, TokenSettings};

#[test]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
fn test_parallel_validation_is_consistent() {
    let settings = TokenSettings::new("parallel-secret", 3600).expect("valid settings");
    let authority = Arc::new(TokenAuthority::new(settings));
    let envelope = Arc::new(authority.issue("read").expect("issue token"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let authority = Arc::clone(&authority);
            let envelope = Arc::clone(&envelope);
            thread::spawn(move || {
                (0..25).all(|_| {
                    authority.validate(&envelope).is_ok()
                        && authority
                            .claims(&envelope.access_token)
                            .is_ok_and(|claims| claims.scope() == "read")
                })
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("validation thread panicked"));
    }
}

#[test]
fn test_parallel_issuance_is_deterministic() {
    let settings = TokenSettings::new("parallel-secret", 3600).expect("valid settings");
    let authority = TokenAuthority::new(settings);

    let tokens: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| authority.issue_until("read", 4_000_000_000)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("issuing thread panicked")
                    .expect("issue token")
                    .access_token
            })
            .collect()
    });

    assert!(tokens.windows(2).all(|pair| pair[0] == pair[1]));
}
