/// Test doubles to simulate the CAN bus and the board during integration tests.
use blackstar_ecm::infra::board::{Board, Indicator, PowerLevels};
use blackstar_ecm::protocol::transport::{can_frame::CanFrame, traits::can_bus::CanBus};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{timeout, Duration};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
///
/// `recv` reports a disconnect once every peer sender is gone.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (ECM ↔ bus master).
    pub fn create_pair() -> (Self, Self) {
        let (ecm_tx, master_rx) = mpsc::unbounded_channel();
        let (master_tx, ecm_rx) = mpsc::unbounded_channel();

        let ecm_bus = Self {
            tx: ecm_tx,
            rx: Arc::new(Mutex::new(ecm_rx)),
        };

        let master_bus = Self {
            tx: master_tx,
            rx: Arc::new(Mutex::new(master_rx)),
        };

        (ecm_bus, master_bus)
    }

    /// Send raw frames, each given as `(id, payload)`.
    pub fn inject(&self, frames: &[(u16, &[u8])]) {
        for (id, payload) in frames {
            let frame = CanFrame::new(*id, payload).expect("test frame must be valid");
            self.tx.send(frame).expect("peer must be alive");
        }
    }

    /// Next frame, or `None` if nothing arrives within `millis`.
    pub async fn next_frame(&self, millis: u64) -> Option<CanFrame> {
        let mut rx = self.rx.lock().await;
        timeout(Duration::from_millis(millis), rx.recv())
            .await
            .ok()
            .flatten()
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(*frame).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        let mut rx = self.rx.lock().await;
        Ok(rx.recv().await)
    }
}

#[allow(dead_code)]
/// Bus whose transmitter breaks after `sends_left` frames.
pub struct FlakyCanBus {
    pub inner: MockCanBus,
    pub sends_left: usize,
}

impl CanBus for FlakyCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self.sends_left == 0 {
            return Err(());
        }
        self.sends_left -= 1;
        self.inner.send(frame).await
    }

    async fn recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        self.inner.recv().await
    }
}

#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
/// Everything the board was asked to do.
pub struct BoardLog {
    pub rf_led: bool,
    pub muted: bool,
    pub amplifier: bool,
    pub fans: bool,
    pub supply: bool,
    pub reboots: usize,
}

#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
/// Board stand-in whose log stays readable after it moved into a worker.
pub struct MockBoard {
    pub log: Arc<StdMutex<BoardLog>>,
    pub slot: u8,
    pub power: PowerLevels,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn in_slot(slot: u8) -> Self {
        Self {
            slot,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> BoardLog {
        self.log.lock().expect("board log poisoned").clone()
    }

    fn update(&self, f: impl FnOnce(&mut BoardLog)) {
        f(&mut self.log.lock().expect("board log poisoned"));
    }
}

impl Board for MockBoard {
    type Error = ();

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        if indicator == Indicator::Rf {
            self.update(|log| log.rf_led = on);
        }
    }
    fn set_amplifier_mute(&mut self, muted: bool) {
        self.update(|log| log.muted = muted);
    }
    fn enable_amplifier(&mut self, enable: bool) -> Result<(), ()> {
        self.update(|log| log.amplifier = enable);
        Ok(())
    }
    fn enable_fans(&mut self, enable: bool) -> Result<(), ()> {
        self.update(|log| log.fans = enable);
        Ok(())
    }
    fn enable_supply(&mut self, enable: bool) -> Result<(), ()> {
        self.update(|log| log.supply = enable);
        Ok(())
    }
    fn read_power_levels(&mut self) -> Result<PowerLevels, ()> {
        Ok(self.power)
    }
    fn slot_number(&self) -> u8 {
        self.slot
    }
    fn request_reboot(&mut self) -> Result<(), ()> {
        self.update(|log| log.reboots += 1);
        Ok(())
    }
}

#[allow(dead_code)]
/// Split an encoded message into 8-byte frame payloads.
pub fn frames_of(message: &[u8]) -> Vec<&[u8]> {
    message.chunks(8).collect()
}
