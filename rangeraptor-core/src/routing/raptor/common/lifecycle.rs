//! Phase events of the round loop.
//!
//! The worker broadcasts each phase transition to the components holding
//! per-iteration or per-round state. They subscribe by implementing
//! `WorkerLifeCycle`; every method defaults to a no-op.

use crate::model::transit::Time;

pub trait WorkerLifeCycle {
    fn route_search_start(&mut self) {}

    fn setup_iteration(&mut self, _departure_time: Time) {}

    fn prepare_for_next_round(&mut self, _round: usize) {}

    fn transits_for_round_complete(&mut self) {}

    fn transfers_for_round_complete(&mut self) {}

    fn round_complete(&mut self, _destination_reached: bool) {}

    fn iteration_complete(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeCycleEvent {
    RouteSearchStart,
    SetupIteration(Time),
    PrepareForNextRound(usize),
    TransitsForRoundComplete,
    TransfersForRoundComplete,
    RoundComplete(bool),
    IterationComplete,
}

impl LifeCycleEvent {
    pub fn notify(self, subscriber: &mut dyn WorkerLifeCycle) {
        match self {
            LifeCycleEvent::RouteSearchStart => subscriber.route_search_start(),
            LifeCycleEvent::SetupIteration(time) => subscriber.setup_iteration(time),
            LifeCycleEvent::PrepareForNextRound(round) => subscriber.prepare_for_next_round(round),
            LifeCycleEvent::TransitsForRoundComplete => subscriber.transits_for_round_complete(),
            LifeCycleEvent::TransfersForRoundComplete => subscriber.transfers_for_round_complete(),
            LifeCycleEvent::RoundComplete(reached) => subscriber.round_complete(reached),
            LifeCycleEvent::IterationComplete => subscriber.iteration_complete(),
        }
    }
}

/// Adapts a closure receiving every event into a subscriber
struct EventListener<F>(F);

impl<F: FnMut(LifeCycleEvent)> WorkerLifeCycle for EventListener<F> {
    fn route_search_start(&mut self) {
        (self.0)(LifeCycleEvent::RouteSearchStart);
    }

    fn setup_iteration(&mut self, departure_time: Time) {
        (self.0)(LifeCycleEvent::SetupIteration(departure_time));
    }

    fn prepare_for_next_round(&mut self, round: usize) {
        (self.0)(LifeCycleEvent::PrepareForNextRound(round));
    }

    fn transits_for_round_complete(&mut self) {
        (self.0)(LifeCycleEvent::TransitsForRoundComplete);
    }

    fn transfers_for_round_complete(&mut self) {
        (self.0)(LifeCycleEvent::TransfersForRoundComplete);
    }

    fn round_complete(&mut self, destination_reached: bool) {
        (self.0)(LifeCycleEvent::RoundComplete(destination_reached));
    }

    fn iteration_complete(&mut self) {
        (self.0)(LifeCycleEvent::IterationComplete);
    }
}

/// Subscribers outside the worker, notified after the worker's own state
#[derive(Default)]
pub struct LifeCycleEventPublisher {
    subscribers: Vec<Box<dyn WorkerLifeCycle + Send>>,
}

impl LifeCycleEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn WorkerLifeCycle + Send>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscribe_fn<F>(&mut self, listener: F)
    where
        F: FnMut(LifeCycleEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(EventListener(listener)));
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn publish(&mut self, event: LifeCycleEvent) {
        for subscriber in &mut self.subscribers {
            event.notify(subscriber.as_mut());
        }
    }
}

impl std::fmt::Debug for LifeCycleEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifeCycleEventPublisher")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn closures_receive_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut publisher = LifeCycleEventPublisher::new();
        let sink = Arc::clone(&seen);
        publisher.subscribe_fn(move |event| sink.lock().unwrap().push(event));

        publisher.publish(LifeCycleEvent::SetupIteration(60));
        publisher.publish(LifeCycleEvent::PrepareForNextRound(1));
        publisher.publish(LifeCycleEvent::RoundComplete(true));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                LifeCycleEvent::SetupIteration(60),
                LifeCycleEvent::PrepareForNextRound(1),
                LifeCycleEvent::RoundComplete(true),
            ]
        );
    }
}
