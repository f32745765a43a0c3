//! Property-based tests for revision chains.

use proptest::prelude::*;

use super::{Revision, RevisionChain};

// Strategy for generating a linear chain of the given length.
fn chain_strategy() -> impl Strategy<Value = RevisionChain> {
    (1usize..=24).prop_map(|len| {
        let revisions = (0..len)
            .map(|i| Revision {
                id: format!("rev_{i:03}"),
                predecessor: (i > 0).then(|| format!("rev_{:03}", i - 1)),
                description: String::new(),
                up: format!("SELECT {i};"),
                down: None,
            })
            .collect();
        RevisionChain::new(revisions).unwrap()
    })
}

proptest! {
    // For every ledger that is a contiguous prefix of the chain, the pending
    // set is the exact ordered suffix after the prefix's last entry.
    #[test]
    fn pending_is_exact_suffix(chain in chain_strategy(), prefix_len in 0usize..=24) {
        let prefix_len = prefix_len.min(chain.len());
        let current = if prefix_len == 0 {
            None
        } else {
            Some(chain.revisions()[prefix_len - 1].id.as_str())
        };

        let pending = chain.pending_after(current).unwrap();
        prop_assert_eq!(pending.len(), chain.len() - prefix_len);
        for (offset, revision) in pending.iter().enumerate() {
            prop_assert_eq!(&revision.id, &chain.revisions()[prefix_len + offset].id);
        }
    }

    // Applying the pending suffix on top of the prefix always reaches head.
    #[test]
    fn prefix_plus_pending_reaches_head(chain in chain_strategy(), prefix_len in 0usize..=24) {
        let prefix_len = prefix_len.min(chain.len());
        let current = (prefix_len > 0).then(|| chain.revisions()[prefix_len - 1].id.clone());

        let pending = chain.pending_after(current.as_deref()).unwrap();
        let last_after_apply = pending
            .last()
            .map(|revision| revision.id.clone())
            .or(current);
        prop_assert_eq!(last_after_apply, chain.head().map(|r| r.id.clone()));
    }
}
