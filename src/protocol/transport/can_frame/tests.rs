//! Frame construction and conversion to/from `embedded_can` frames.
use super::*;
use embedded_can::ExtendedId;

/// Minimal driver frame used to exercise the conversions.
#[derive(Debug, Clone)]
struct DriverFrame {
    id: Id,
    remote: bool,
    data: [u8; 8],
    dlc: usize,
}

impl Frame for DriverFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let mut buffer = [0u8; 8];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            remote: false,
            data: buffer,
            dlc: data.len(),
        })
    }
    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        Some(Self {
            id: id.into(),
            remote: true,
            data: [0; 8],
            dlc,
        })
    }
    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }
    fn is_remote_frame(&self) -> bool {
        self.remote
    }
    fn id(&self) -> Id {
        self.id
    }
    fn dlc(&self) -> usize {
        self.dlc
    }
    fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }
}

#[test]
/// Payloads longer than eight bytes or ids beyond 11 bits are refused.
fn test_new_limits() {
    assert!(CanFrame::new(0x0A, &[0; 9]).is_none());
    assert!(CanFrame::new(0x800, &[1]).is_none());

    let frame = CanFrame::new(0x0A, &[1, 2, 3]).expect("valid frame");
    assert_eq!(frame.payload(), &[1, 2, 3]);
    assert_eq!(frame.len, 3);
}

#[test]
/// Standard data frames convert both ways.
fn test_embedded_conversion() {
    let frame = CanFrame::new(0x0B, &[0xC0, 0x04]).expect("valid frame");
    let driver: DriverFrame = frame.to_embedded().expect("convertible");
    assert!(!driver.is_extended());
    assert_eq!(driver.data(), &[0xC0, 0x04]);

    let back = CanFrame::from_embedded(&driver).expect("standard data frame");
    assert_eq!(back, frame);
}

#[test]
/// Extended and remote frames are not protocol frames.
fn test_embedded_rejects_extended_and_remote() {
    let extended = DriverFrame::new(ExtendedId::new(0x0A).expect("id"), &[1]).expect("frame");
    assert!(CanFrame::from_embedded(&extended).is_none());

    let remote = DriverFrame::new_remote(StandardId::new(0x0A).expect("id"), 2).expect("frame");
    assert!(CanFrame::from_embedded(&remote).is_none());
}
