//! Reply-chain reconstruction.

use std::collections::HashSet;

use crate::{context::RequestContext, ports::PostFetcher, post::Post};

/// Upper bound on ancestor hops for one chain.
pub const MAX_CHAIN_DEPTH: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainRole {
    /// The post the user asked for.
    Root,
    /// An ancestor of the root.
    Reply,
    /// A post quoted by an ancestor.
    Quote,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChainEntry {
    pub post: Post,
    pub role: ChainRole,
}

/// Ordered conversation leading to `root`: oldest ancestor first, each ancestor
/// preceded by its direct quote, the root last.
///
/// The walk stops at the first ancestor that cannot be fetched (missing handle,
/// upstream error, timeout, cancellation), at a repeated post, or after
/// [`MAX_CHAIN_DEPTH`] hops. Whatever was collected is kept.
pub async fn build_chain(
    ctx: &RequestContext,
    fetcher: &dyn PostFetcher,
    root: Option<&Post>,
) -> Vec<ChainEntry> {
    let Some(root) = root else {
        return Vec::new();
    };

    let mut visited: HashSet<(String, String)> = HashSet::new();
    visited.insert((root.author.screen_name.clone(), root.id.clone()));

    // Ancestors nearest-first.
    let mut ancestors: Vec<Post> = Vec::new();
    let mut next = root.ancestor();

    while let Some(parent) = next.take() {
        if ancestors.len() >= MAX_CHAIN_DEPTH {
            tracing::debug!(post_id = %root.id, "chain depth cap reached");
            break;
        }
        if !visited.insert((parent.handle.clone(), parent.post_id.clone())) {
            tracing::debug!(handle = %parent.handle, post_id = %parent.post_id, "chain cycle");
            break;
        }

        let fetched = ctx
            .run(fetcher.get_post(ctx, &parent.handle, &parent.post_id))
            .await;
        match fetched {
            Ok(post) => {
                next = post.ancestor();
                ancestors.push(post);
            }
            Err(e) => {
                tracing::debug!(
                    handle = %parent.handle,
                    post_id = %parent.post_id,
                    error = %e,
                    "chain walk stopped"
                );
                break;
            }
        }
    }

    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    for post in ancestors.into_iter().rev() {
        if let Some(q) = post.quote.as_deref() {
            out.push(ChainEntry {
                post: q.clone(),
                role: ChainRole::Quote,
            });
        }
        out.push(ChainEntry {
            post,
            role: ChainRole::Reply,
        });
    }
    out.push(ChainEntry {
        post: root.clone(),
        role: ChainRole::Root,
    });
    out
}

/// Depth-first quote chain: the direct quote first, then what it quotes, and so on.
pub fn quoted_posts(post: &Post) -> Vec<Post> {
    let mut out = Vec::new();
    let mut cur = post.quote.as_deref();
    while let Some(q) = cur {
        if out.len() >= MAX_CHAIN_DEPTH {
            break;
        }
        out.push(q.clone());
        cur = q.quote.as_deref();
    }
    out
}
