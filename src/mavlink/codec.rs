use crate::mavlink::messages::{
    CommandAck, CommandLong, Heartbeat, HilActuatorControls, HilGps, HilSensor,
    HilStateQuaternion, SystemTime,
};
use crate::mavlink::MavFrame;

const MAV_STX: u8 = 0xFD;
const HEADER_LEN: usize = 10;
const CHECKSUM_LEN: usize = 2;
const SIGNATURE_LEN: usize = 13;
const INCOMPAT_FLAG_SIGNED: u8 = 0x01;

/// X25 / MCRF4XX checksum accumulation used by MAVLink
fn crc_accumulate(crc: &mut u16, byte: u8) {
    let mut tmp = byte ^ (*crc & 0xff) as u8;
    tmp ^= tmp << 4;
    *crc = (*crc >> 8) ^ ((tmp as u16) << 8) ^ ((tmp as u16) << 3) ^ ((tmp as u16) >> 4);
}

/// Per-message checksum seed; `None` for ids outside the HIL dialect
fn crc_extra(message_id: u32) -> Option<u8> {
    match message_id {
        Heartbeat::ID => Some(Heartbeat::CRC_EXTRA),
        SystemTime::ID => Some(SystemTime::CRC_EXTRA),
        CommandLong::ID => Some(CommandLong::CRC_EXTRA),
        CommandAck::ID => Some(CommandAck::CRC_EXTRA),
        HilActuatorControls::ID => Some(HilActuatorControls::CRC_EXTRA),
        HilSensor::ID => Some(HilSensor::CRC_EXTRA),
        HilGps::ID => Some(HilGps::CRC_EXTRA),
        HilStateQuaternion::ID => Some(HilStateQuaternion::CRC_EXTRA),
        _ => None,
    }
}

/// Serializes frames with the v2 header, trailing-zero payload truncation
/// and running sequence number. Signing is not used.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    sequence: u8,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a frame to raw bytes; `None` for ids outside the dialect
    pub fn encode(&mut self, frame: &MavFrame) -> Option<Vec<u8>> {
        let extra = crc_extra(frame.message_id)?;

        let mut trimmed = frame.payload.len();
        while trimmed > 1 && frame.payload[trimmed - 1] == 0 {
            trimmed -= 1;
        }

        let mut out = Vec::with_capacity(HEADER_LEN + trimmed + CHECKSUM_LEN);
        out.push(MAV_STX);
        out.push(trimmed as u8);
        out.push(0); // incompat_flags
        out.push(0); // compat_flags
        out.push(self.sequence);
        out.push(frame.system_id);
        out.push(frame.component_id);
        out.push((frame.message_id & 0xff) as u8);
        out.push(((frame.message_id >> 8) & 0xff) as u8);
        out.push(((frame.message_id >> 16) & 0xff) as u8);
        out.extend_from_slice(&frame.payload[..trimmed]);

        let mut crc = 0xffff;
        for &byte in &out[1..] {
            crc_accumulate(&mut crc, byte);
        }
        crc_accumulate(&mut crc, extra);
        out.push((crc & 0xff) as u8);
        out.push((crc >> 8) as u8);

        self.sequence = self.sequence.wrapping_add(1);
        Some(out)
    }
}

/// Incremental v2 stream decoder. Garbage between frames, unknown message
/// ids and checksum failures are consumed silently; only complete,
/// verified frames come out.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<MavFrame> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();

        loop {
            // Resynchronize on the start marker
            match self.buffer.iter().position(|&b| b == MAV_STX) {
                Some(0) => {}
                Some(offset) => {
                    self.buffer.drain(..offset);
                }
                None => {
                    self.buffer.clear();
                    break;
                }
            }

            if self.buffer.len() < HEADER_LEN {
                break;
            }

            let payload_len = self.buffer[1] as usize;
            let signed = self.buffer[2] & INCOMPAT_FLAG_SIGNED != 0;
            let total = HEADER_LEN
                + payload_len
                + CHECKSUM_LEN
                + if signed { SIGNATURE_LEN } else { 0 };
            if self.buffer.len() < total {
                break;
            }

            match self.parse_frame(payload_len) {
                Some(frame) => {
                    frames.push(frame);
                    self.buffer.drain(..total);
                }
                None => {
                    // Bad checksum or foreign id: drop the marker, rescan
                    self.buffer.drain(..1);
                }
            }
        }

        frames
    }

    fn parse_frame(&self, payload_len: usize) -> Option<MavFrame> {
        let buf = &self.buffer;
        let message_id = (buf[7] as u32) | ((buf[8] as u32) << 8) | ((buf[9] as u32) << 16);
        let extra = match crc_extra(message_id) {
            Some(extra) => extra,
            None => {
                log::trace!("dropping unknown message id {message_id}");
                return None;
            }
        };

        let mut crc = 0xffff;
        for &byte in &buf[1..HEADER_LEN + payload_len] {
            crc_accumulate(&mut crc, byte);
        }
        crc_accumulate(&mut crc, extra);

        let received = (buf[HEADER_LEN + payload_len] as u16)
            | ((buf[HEADER_LEN + payload_len + 1] as u16) << 8);
        if crc != received {
            log::trace!("checksum mismatch on message id {message_id}");
            return None;
        }

        Some(MavFrame {
            system_id: buf[5],
            component_id: buf[6],
            message_id,
            payload: buf[HEADER_LEN..HEADER_LEN + payload_len].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mavlink::{COMPONENT_ID, SYSTEM_ID};

    fn heartbeat_frame() -> MavFrame {
        MavFrame {
            system_id: SYSTEM_ID,
            component_id: COMPONENT_ID,
            message_id: Heartbeat::ID,
            payload: vec![0, 0, 0, 0, 2, 12, 0, 4, 3],
        }
    }

    #[test]
    fn test_encode_decode_cycle() {
        let mut encoder = FrameEncoder::new();
        let mut decoder = FrameDecoder::new();

        let bytes = encoder.encode(&heartbeat_frame()).unwrap();
        let frames = decoder.push(&bytes);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].message_id, Heartbeat::ID);
        assert_eq!(frames[0].system_id, SYSTEM_ID);
    }

    #[test]
    fn test_trailing_zeros_are_truncated() {
        let mut encoder = FrameEncoder::new();
        let frame = MavFrame {
            system_id: 1,
            component_id: 1,
            message_id: SystemTime::ID,
            payload: vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        };
        let bytes = encoder.encode(&frame).unwrap();
        // stx + header + single surviving payload byte + crc
        assert_eq!(bytes.len(), HEADER_LEN + 1 + CHECKSUM_LEN);
        assert_eq!(bytes[1], 1);
    }

    #[test]
    fn test_decoder_resynchronizes_after_garbage() {
        let mut encoder = FrameEncoder::new();
        let mut decoder = FrameDecoder::new();

        let mut stream = vec![0x55, 0xaa, 0x00];
        stream.extend(encoder.encode(&heartbeat_frame()).unwrap());
        let frames = decoder.push(&stream);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_decoder_handles_split_input() {
        let mut encoder = FrameEncoder::new();
        let mut decoder = FrameDecoder::new();

        let bytes = encoder.encode(&heartbeat_frame()).unwrap();
        let (head, tail) = bytes.split_at(6);
        assert!(decoder.push(head).is_empty());
        let frames = decoder.push(tail);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_corrupted_frame_is_dropped() {
        let mut encoder = FrameEncoder::new();
        let mut decoder = FrameDecoder::new();

        let mut bytes = encoder.encode(&heartbeat_frame()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(decoder.push(&bytes).is_empty());

        // And the stream recovers for the next good frame
        let good = encoder.encode(&heartbeat_frame()).unwrap();
        let frames = decoder.push(&good);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_sequence_increments() {
        let mut encoder = FrameEncoder::new();
        let a = encoder.encode(&heartbeat_frame()).unwrap();
        let b = encoder.encode(&heartbeat_frame()).unwrap();
        assert_eq!(a[4], 0);
        assert_eq!(b[4], 1);
    }
}
