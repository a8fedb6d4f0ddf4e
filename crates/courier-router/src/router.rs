// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing orchestrator.
//!
//! Per message: classify -> authorize -> (roster) -> detached persist ->
//! fan out -> account. Authorization always completes before persistence or
//! any enqueue.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use courier_config::model::RouterConfig;
use courier_core::types::{
    DeliveryEnvelope, FanOutResult, GroupId, InboundMessage, Route, UserId,
};
use courier_core::{
    CourierError, DeliveryQueue, FriendDirectory, GroupDirectory, MessageProcessor, MessageStore,
    RequestContext, StatusDirectory,
};
use tracing::{debug, error, info, warn, Instrument};

use crate::classifier::{classify, fan_out_targets};
use crate::fanout::FanOutTally;
use crate::persist::PersistencePublisher;
use crate::recording;
use crate::topic::TopicResolver;

/// Shown to a sender who is not a friend of the recipient.
pub const NOT_FRIENDS_MESSAGE: &str = "you can only message users on your friend list";

/// Shown to a sender who is not a member of the target group.
pub const NOT_MEMBER_MESSAGE: &str = "you are not a member of this group";

/// Remote collaborators the router drives.
///
/// All clients are shared; the router itself holds no mutable state.
#[derive(Clone)]
pub struct Collaborators {
    pub friends: Arc<dyn FriendDirectory + Send + Sync>,
    pub groups: Arc<dyn GroupDirectory + Send + Sync>,
    pub store: Arc<dyn MessageStore + Send + Sync>,
    pub queue: Arc<dyn DeliveryQueue + Send + Sync>,
    /// Only consulted when `route_by_node` is enabled.
    pub status: Option<Arc<dyn StatusDirectory + Send + Sync>>,
}

/// Classifies, authorizes, persists, and fans out inbound messages.
pub struct Router {
    friends: Arc<dyn FriendDirectory + Send + Sync>,
    groups: Arc<dyn GroupDirectory + Send + Sync>,
    queue: Arc<dyn DeliveryQueue + Send + Sync>,
    persistence: PersistencePublisher,
    topics: TopicResolver,
}

impl Router {
    /// Build a router from its collaborators and configuration.
    ///
    /// Fails when `route_by_node` is set but no status directory is given.
    pub fn new(config: &RouterConfig, collaborators: Collaborators) -> Result<Self, CourierError> {
        let topics = match (config.route_by_node, collaborators.status) {
            (true, Some(status)) => TopicResolver::by_node(config.delivery_topic.clone(), status),
            (true, None) => {
                return Err(CourierError::Config(
                    "router.route_by_node requires a status directory".to_string(),
                ));
            }
            (false, _) => TopicResolver::fixed(config.delivery_topic.clone()),
        };

        Ok(Self {
            friends: collaborators.friends,
            groups: collaborators.groups,
            queue: collaborators.queue,
            persistence: PersistencePublisher::new(
                collaborators.store,
                Duration::from_millis(config.persist_timeout_ms),
            ),
            topics,
        })
    }

    pub fn topics(&self) -> &TopicResolver {
        &self.topics
    }

    /// Route a one-to-one message.
    async fn route_private(
        &self,
        ctx: &RequestContext,
        msg: InboundMessage,
        to: UserId,
    ) -> Result<FanOutResult, CourierError> {
        match ctx.run(self.friends.is_friend(msg.from, to)).await {
            Ok(true) => {}
            Ok(false) => {
                info!(to, "sender is not a friend of the recipient");
                recording::record_denied("private");
                return Ok(FanOutResult::denied(msg.message_id, NOT_FRIENDS_MESSAGE));
            }
            Err(CourierError::Cancelled) => return Err(CourierError::Cancelled),
            Err(e) => {
                warn!(to, error = %e, "friendship lookup failed, refusing delivery");
                recording::record_denied("private");
                return Ok(FanOutResult::denied(msg.message_id, NOT_FRIENDS_MESSAGE));
            }
        }

        let _ = self.persistence.publish(msg.clone());

        let mut tally = FanOutTally::new();
        let outcome = self.deliver(ctx, &msg, to).await;
        if matches!(outcome, Err(CourierError::Cancelled)) {
            return Err(CourierError::Cancelled);
        }
        tally.record(to, &outcome);
        Ok(tally.finish(msg.message_id))
    }

    /// Route a group message to every other member of the roster.
    async fn route_group(
        &self,
        ctx: &RequestContext,
        msg: InboundMessage,
        group_id: GroupId,
    ) -> Result<FanOutResult, CourierError> {
        match ctx.run(self.groups.is_member(group_id, msg.from)).await {
            Ok(true) => {}
            Ok(false) => {
                info!("sender is not a member of the group");
                recording::record_denied("group");
                return Ok(FanOutResult::denied(msg.message_id, NOT_MEMBER_MESSAGE));
            }
            Err(CourierError::Cancelled) => return Err(CourierError::Cancelled),
            Err(e) => {
                warn!(error = %e, "membership lookup failed, refusing delivery");
                recording::record_denied("group");
                return Ok(FanOutResult::denied(msg.message_id, NOT_MEMBER_MESSAGE));
            }
        }

        // Without the roster there is no safe partial fan-out.
        let roster = ctx
            .run(self.groups.members(group_id))
            .await
            .inspect_err(|e| error!(error = %e, "roster lookup failed"))?;

        let targets = fan_out_targets(msg.from, &roster);
        debug!(
            roster = roster.len(),
            targets = targets.len(),
            "group roster resolved"
        );

        let _ = self.persistence.publish(msg.clone());

        let mut tally = FanOutTally::new();
        for target in targets {
            let outcome = self.deliver(ctx, &msg, target).await;
            if matches!(outcome, Err(CourierError::Cancelled)) {
                warn!(
                    attempted = tally.attempted(),
                    "fan-out cancelled before all members were attempted"
                );
                return Err(CourierError::Cancelled);
            }
            tally.record(target, &outcome);
        }
        Ok(tally.finish(msg.message_id))
    }

    /// Enqueue one envelope for `target`.
    async fn deliver(
        &self,
        ctx: &RequestContext,
        msg: &InboundMessage,
        target: UserId,
    ) -> Result<(), CourierError> {
        let topic = self.topics.resolve(ctx, target).await;
        let envelope = DeliveryEnvelope::for_target(msg, target);
        let outcome = ctx.run(self.queue.publish(&topic, &envelope)).await;

        match &outcome {
            Ok(()) => {
                recording::record_delivery(true);
                debug!(user_id = target, topic = %topic, "envelope enqueued");
            }
            Err(CourierError::Cancelled) => {}
            Err(e) => {
                recording::record_delivery(false);
                warn!(user_id = target, topic = %topic, error = %e, "envelope enqueue failed");
            }
        }
        outcome
    }
}

#[async_trait]
impl MessageProcessor for Router {
    async fn process_message(
        &self,
        ctx: &RequestContext,
        msg: InboundMessage,
    ) -> Result<FanOutResult, CourierError> {
        let route = classify(&msg).inspect_err(|e| {
            recording::record_rejected();
            debug!(
                request_id = ctx.request_id(),
                message_id = %msg.message_id,
                error = %e,
                "message rejected"
            );
        })?;

        let span = tracing::info_span!(
            "route",
            request_id = ctx.request_id(),
            session_id = ctx.session_id(),
            message_id = %msg.message_id,
            from = msg.from,
            route = route.label(),
            group_id = msg.group_id,
        );

        async move {
            let started = Instant::now();
            recording::record_message(route.label());

            let result = match route {
                Route::Private { to } => self.route_private(ctx, msg, to).await,
                Route::Group { group_id } => self.route_group(ctx, msg, group_id).await,
            };

            recording::record_latency(started.elapsed().as_secs_f64());
            if let Ok(ref res) = result {
                debug!(
                    success = res.success,
                    success_count = res.success_count,
                    failure_count = res.failure_count,
                    "message routed"
                );
            }
            result
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("topics", &self.topics)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}
