// src/tree/walk.rs
// =============================================================================
// Concurrent tree walks and the comparison built on top of them.
//
// How it works:
// 1. walk() spawns a task that visits the tree in order
// 2. Each value is sent into a channel with room for a single value,
//    so the walker waits until the reader has taken the previous one
// 3. When the walk ends, the task drops its Sender, which closes the channel
// 4. same() runs two walks at once and reads both channels in lockstep
//
// Early exit:
// - If same() finds a mismatch it returns and drops both Receivers
// - The next send() in each walker then fails and the walker stops
//
// Rust concepts:
// - tokio::spawn: Runs a future on the runtime's worker threads
// - mpsc channels: Hand values from one task to another
// - tokio::join!: Waits on two futures at the same time
// =============================================================================

use super::Tree;
use std::sync::Arc;
use tokio::sync::mpsc;

// Room for one value in flight between walker and reader
const HANDOFF_CAPACITY: usize = 1;

/// Walks `tree` in order on a separate task.
///
/// Returns the receiving end of the walk. It yields every value once, left
/// subtree first, and returns `None` after the last one. Must be called from
/// inside a tokio runtime.
pub fn walk(tree: Arc<Tree>) -> mpsc::Receiver<i64> {
    let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);

    tokio::spawn(async move {
        // An explicit stack instead of recursion: recursive async fns
        // need boxing, and this keeps the walk a single future
        let mut stack: Vec<&Tree> = Vec::new();
        let mut current = Some(tree.as_ref());

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left();
            }
            let Some(node) = stack.pop() else { break };

            if tx.send(node.value()).await.is_err() {
                tracing::trace!("walk receiver dropped, stopping early");
                return;
            }
            current = node.right();
        }
        // tx is dropped here, which closes the channel
    });

    rx
}

/// Reports whether `a` and `b` walk to the same sequence of values.
///
/// Both walks run concurrently. Returns `false` as soon as a pair differs or
/// one walk finishes before the other.
pub async fn same(a: Arc<Tree>, b: Arc<Tree>) -> bool {
    let mut left = walk(a);
    let mut right = walk(b);

    loop {
        match tokio::join!(left.recv(), right.recv()) {
            (Some(x), Some(y)) if x == y => continue,
            (Some(x), Some(y)) => {
                tracing::debug!(left = x, right = y, "trees differ");
                return false;
            }
            (None, None) => return true,
            // One walk ended before the other
            (Some(_), None) | (None, Some(_)) => {
                tracing::debug!("trees have different lengths");
                return false;
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a channel with capacity 1?
//    - The walker can only run one value ahead of the reader
//    - send().await suspends the walker until there is room again
//    - This keeps memory use flat no matter how big the tree is
//
// 2. How does the reader know the walk is over?
//    - recv() returns None once every Sender is dropped and the channel
//      is empty
//    - The walker's only Sender is dropped when its task ends
//
// 3. Why Arc<Tree>?
//    - tokio::spawn needs a 'static future, so the task must own its data
//    - Arc gives shared ownership: the caller and the walker both keep it
//    - Tree is never mutated, so no Mutex is needed
//
// 4. Can a task hold &Tree across an .await?
//    - Yes. The references point into the Arc owned by the same async
//      block, so they live exactly as long as the task does
// -----------------------------------------------------------------------------
