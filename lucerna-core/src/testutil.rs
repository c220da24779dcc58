//! Shared mock collaborators for session tests
//!
//! Mocks hold their observable state in a `RefCell` owned by the test so
//! the session can own the mock while the test inspects what it did.

use core::cell::RefCell;

use lucerna_protocol::{apply_masked, PeerAddr, MAX_MESSAGE_LEN};

use crate::traits::{LightSink, PeerRecord, PeerStore, StatusSink, StoreError, Transport, TransportError};

pub(crate) type FrameVec = heapless::Vec<u8, MAX_MESSAGE_LEN>;

#[derive(Default)]
pub(crate) struct RadioLog {
    pub unicasts: heapless::Vec<(PeerAddr, FrameVec), 32>,
    pub broadcasts: heapless::Vec<FrameVec, 8>,
    pub peers: heapless::Vec<PeerAddr, 8>,
}

pub(crate) struct MockRadio<'a>(pub &'a RefCell<RadioLog>);

impl Transport for MockRadio<'_> {
    fn send_unicast(&mut self, dest: PeerAddr, frame: &[u8]) -> Result<(), TransportError> {
        let mut copy = FrameVec::new();
        copy.extend_from_slice(frame).map_err(|_| TransportError::Send)?;
        self.0
            .borrow_mut()
            .unicasts
            .push((dest, copy))
            .map_err(|_| TransportError::Send)
    }

    fn send_broadcast(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let mut copy = FrameVec::new();
        copy.extend_from_slice(frame).map_err(|_| TransportError::Send)?;
        self.0
            .borrow_mut()
            .broadcasts
            .push(copy)
            .map_err(|_| TransportError::Send)
    }

    fn register_peer(&mut self, addr: PeerAddr) -> Result<(), TransportError> {
        let mut log = self.0.borrow_mut();
        if !log.peers.contains(&addr) {
            log.peers.push(addr).map_err(|_| TransportError::PeerTable)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct StoreState {
    pub record: Option<PeerRecord>,
    pub saves: u8,
}

pub(crate) struct MockStore<'a>(pub &'a RefCell<StoreState>);

impl PeerStore for MockStore<'_> {
    fn load(&mut self) -> Result<Option<PeerRecord>, StoreError> {
        Ok(self.0.borrow().record)
    }

    fn save(&mut self, record: &PeerRecord) -> Result<(), StoreError> {
        let mut state = self.0.borrow_mut();
        state.record = Some(*record);
        state.saves += 1;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct StatusLog {
    pub states: heapless::Vec<u8, 32>,
    pub connections: heapless::Vec<bool, 8>,
}

pub(crate) struct MockStatus<'a>(pub &'a RefCell<StatusLog>);

impl StatusSink for MockStatus<'_> {
    fn on_state_changed(&mut self, light_state: u8) {
        let _ = self.0.borrow_mut().states.push(light_state);
    }

    fn on_connection_changed(&mut self, connected: bool) {
        let _ = self.0.borrow_mut().connections.push(connected);
    }
}

#[derive(Default)]
pub(crate) struct LightsState {
    pub state: u8,
    pub applies: u8,
    pub all_off_calls: u8,
}

pub(crate) struct MockLights<'a>(pub &'a RefCell<LightsState>);

impl LightSink for MockLights<'_> {
    fn apply(&mut self, mask: u8, state: u8) {
        let mut lights = self.0.borrow_mut();
        lights.state = apply_masked(lights.state, mask, state);
        lights.applies += 1;
    }

    fn get_state(&self) -> u8 {
        self.0.borrow().state
    }

    fn all_off(&mut self) {
        let mut lights = self.0.borrow_mut();
        lights.state = 0;
        lights.all_off_calls += 1;
    }
}
