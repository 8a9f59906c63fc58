use futures::{stream, FutureExt, StreamExt, TryStreamExt};
use tracing::{info, warn};

use super::experience::{compute_experience, compute_level};
use super::roster::{resolve_group_members, RosterKey};
use super::DomainError;
use crate::activity::{ActivityClient, ActivityError};
use crate::db::UserStore;
use crate::models::{EnrichedMember, Member, RankedEntry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    /// One member's lookup failed, so no ranking is produced for the group
    #[error("Activity lookup failed for {identity}: {source}")]
    ActivityLookupFailed {
        identity: String,
        #[source]
        source: ActivityError,
    },
}

impl RankingError {
    pub fn identity(&self) -> &str {
        match self {
            RankingError::ActivityLookupFailed { identity, .. } => identity,
        }
    }
}

/// Resolve a roster and rank it. Shared by the by-user and by-group endpoints.
#[tracing::instrument(skip(store, client))]
pub async fn calculate_ranking_for(
    key: RosterKey<'_>,
    store: &dyn UserStore,
    client: &dyn ActivityClient,
    max_concurrent_lookups: usize,
) -> Result<Vec<RankedEntry>, DomainError> {
    let members = resolve_group_members(store, key).await?;
    info!(member_count = members.len(), "Resolved roster");

    Ok(build_ranking(client, &members, max_concurrent_lookups).await?)
}

/// Build the leaderboard for a roster
///
/// This function:
/// 1. Looks up every member's activity, at most `max_concurrent_lookups` at a time
/// 2. Derives experience and level per member
/// 3. Sorts by experience, highest first, keeping roster order among ties
/// 4. Assigns competition ranks
///
/// The first failing lookup in roster order aborts the whole ranking; lookups
/// still in flight are dropped.
#[tracing::instrument(skip(client, members), fields(member_count = members.len()))]
pub async fn build_ranking(
    client: &dyn ActivityClient,
    members: &[Member],
    max_concurrent_lookups: usize,
) -> Result<Vec<RankedEntry>, RankingError> {
    let lookups: Vec<_> = members
        .iter()
        .map(|member| enrich_member(client, member).boxed())
        .collect();
    let enriched: Vec<EnrichedMember> = stream::iter(lookups)
        .buffered(max_concurrent_lookups.max(1))
        .try_collect()
        .await?;

    Ok(rank_members(enriched))
}

async fn enrich_member(
    client: &dyn ActivityClient,
    member: &Member,
) -> Result<EnrichedMember, RankingError> {
    let activity = client
        .fetch_activity(&member.identity)
        .await
        .map_err(|source| {
            warn!(identity = %member.identity, error = %source, "Activity lookup failed, aborting ranking");
            RankingError::ActivityLookupFailed {
                identity: member.identity.clone(),
                source,
            }
        })?;

    let experience = compute_experience(&member.registered_at, &activity);

    Ok(EnrichedMember {
        identity: member.identity.clone(),
        group: member.group.clone(),
        experience,
        level: compute_level(experience),
    })
}

/// Sort by experience (descending, stable) and assign competition ranks.
///
/// Equal experience shares a rank and the next lower experience takes the next
/// integer: [50, 50, 30] ranks as [1, 1, 2].
pub fn rank_members(mut members: Vec<EnrichedMember>) -> Vec<RankedEntry> {
    // sort_by is stable, so ties stay in roster order
    members.sort_by(|a, b| b.experience.cmp(&a.experience));

    let mut ranked = Vec::with_capacity(members.len());
    let mut rank: u32 = 0;
    let mut previous_experience: Option<u64> = None;

    for member in members {
        if previous_experience != Some(member.experience) {
            rank += 1;
            previous_experience = Some(member.experience);
        }

        ranked.push(RankedEntry {
            identity: member.identity,
            group: member.group,
            experience: member.experience,
            level: member.level,
            rank,
        });
    }

    ranked
}
