//! Periodic sensor refresh.
//!
//! A single task owns the sensor list. After every refresh it publishes an
//! immutable [`Snapshot`] on a `watch` channel, so HTTP handlers always see all
//! three sensors from the same refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::sensor::{FakeSensor, STEP};

#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Completed refreshes since start.
    pub generation: u64,
    pub sensors: Vec<FakeSensor>,
}

pub type SnapshotReceiver = watch::Receiver<Arc<Snapshot>>;

struct SensorUpdater {
    sensors: Vec<FakeSensor>,
    generation: u64,
    publish: watch::Sender<Arc<Snapshot>>,
}

impl SensorUpdater {
    fn refresh(&mut self) {
        for sensor in &mut self.sensors {
            if let Err(e) = sensor.advance(STEP) {
                error!("Skipping sensor update: {}", e);
            }
        }
        self.generation += 1;
        debug!("Sensors refreshed (generation {})", self.generation);
        self.publish.send_replace(Arc::new(Snapshot {
            generation: self.generation,
            sensors: self.sensors.clone(),
        }));
    }

    async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        // erster Tick erst nach einer vollen Periode
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh(),
                _ = shutdown.changed() => break,
            }
        }
        info!("Sensor updater stopped after {} refreshes", self.generation);
    }
}

pub struct UpdaterHandle {
    snapshots: SnapshotReceiver,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl UpdaterHandle {
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    /// Stops the refresh loop and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Sensor updater task failed: {}", e);
        }
    }
}

pub fn spawn(sensors: Vec<FakeSensor>, period: Duration) -> UpdaterHandle {
    let (publish, snapshots) = watch::channel(Arc::new(Snapshot {
        generation: 0,
        sensors: sensors.clone(),
    }));
    let (shutdown, shutdown_rx) = watch::channel(false);

    let updater = SensorUpdater {
        sensors,
        generation: 0,
        publish,
    };
    info!("Sensor updater running, refresh every {:?}", period);
    let task = tokio::spawn(updater.run(period, shutdown_rx));

    UpdaterHandle {
        snapshots,
        shutdown,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::default_sensors;

    const PERIOD: Duration = Duration::from_secs(5);

    fn values(snapshot: &Snapshot) -> Vec<String> {
        snapshot.sensors.iter().map(|s| s.value.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn starts_with_initial_values() {
        let handle = spawn(default_sensors(), PERIOD);
        let rx = handle.subscribe();
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.generation, 0);
        assert_eq!(values(&snapshot), ["88.0", "20.0", "11.0"]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_changes_inside_one_period() {
        let handle = spawn(default_sensors(), PERIOD);
        let rx = handle.subscribe();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(values(&rx.borrow()), ["88.0", "20.0", "11.0"]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn each_period_adds_a_tenth() {
        let handle = spawn(default_sensors(), PERIOD);
        let mut rx = handle.subscribe();

        rx.changed().await.unwrap();
        let first = rx.borrow_and_update().clone();
        assert_eq!(first.generation, 1);
        assert_eq!(values(&first), ["88.1", "20.1", "11.1"]);

        rx.changed().await.unwrap();
        let second = rx.borrow_and_update().clone();
        assert_eq!(second.generation, 2);
        assert_eq!(values(&second), ["88.2", "20.2", "11.2"]);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_the_channel() {
        let handle = spawn(default_sensors(), PERIOD);
        let mut rx = handle.subscribe();
        handle.shutdown().await;
        assert!(rx.changed().await.is_err());
        assert_eq!(rx.borrow().generation, 0);
    }

    #[test]
    fn bad_value_is_skipped_and_others_advance() {
        let mut sensors = default_sensors();
        sensors[1].value = "n/a".to_string();
        let (publish, rx) = watch::channel(Arc::new(Snapshot {
            generation: 0,
            sensors: sensors.clone(),
        }));
        let mut updater = SensorUpdater {
            sensors,
            generation: 0,
            publish,
        };

        updater.refresh();
        updater.refresh();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(values(&snapshot), ["88.2", "n/a", "11.2"]);
    }
}
