use crossbeam_channel::Sender;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::mavlink::{FrameDecoder, FrameEncoder, MavFrame};
use crate::sim::MessageRelay;

/// MAVLink relay over a single autopilot TCP connection. A reader thread
/// decodes the inbound byte stream and fans complete frames out to the
/// registered handlers; outbound frames are serialized onto the same
/// socket. Any transport error closes the connection state, the tick loop
/// keeps running without publishing.
pub struct TcpMessageRelay {
    stream: Mutex<TcpStream>,
    encoder: Mutex<FrameEncoder>,
    handlers: Mutex<Vec<Sender<MavFrame>>>,
    open: AtomicBool,
}

impl TcpMessageRelay {
    pub fn start(stream: TcpStream) -> io::Result<Arc<Self>> {
        stream.set_nodelay(true)?;
        let reader = stream.try_clone()?;

        let relay = Arc::new(Self {
            stream: Mutex::new(stream),
            encoder: Mutex::new(FrameEncoder::new()),
            handlers: Mutex::new(Vec::new()),
            open: AtomicBool::new(true),
        });

        let worker = Arc::clone(&relay);
        thread::Builder::new()
            .name("mavlink-rx".to_string())
            .spawn(move || worker.read_loop(reader))?;

        Ok(relay)
    }

    fn read_loop(&self, mut reader: TcpStream) {
        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; 1024];

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    for frame in decoder.push(&buf[..n]) {
                        let handlers = self.handlers.lock().unwrap();
                        for handler in handlers.iter() {
                            let _ = handler.send(frame.clone());
                        }
                    }
                }
                Err(err) => {
                    log::warn!("relay read failed: {err}");
                    break;
                }
            }
        }

        self.open.store(false, Ordering::SeqCst);
        log::info!("autopilot connection closed");
    }
}

impl MessageRelay for TcpMessageRelay {
    fn add_message_handler(&self, handler: Sender<MavFrame>) {
        self.handlers.lock().unwrap().push(handler);
    }

    fn enqueue_message(&self, frame: MavFrame) {
        if !self.open.load(Ordering::SeqCst) {
            return;
        }
        let bytes = match self.encoder.lock().unwrap().encode(&frame) {
            Some(bytes) => bytes,
            None => {
                log::warn!("refusing to send message id {} outside the dialect", frame.message_id);
                return;
            }
        };
        if let Err(err) = self.stream.lock().unwrap().write_all(&bytes) {
            log::warn!("relay write failed: {err}");
            self.open.store(false, Ordering::SeqCst);
        }
    }

    fn connection_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mavlink::{CommandAck, HilGps, SystemTime};
    use std::net::TcpListener;
    use std::time::Duration;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (server, _) = listener.accept().unwrap();
        (server, client)
    }

    #[test]
    fn test_inbound_frames_reach_handler() {
        let (server, mut client) = connected_pair();
        let relay = TcpMessageRelay::start(server).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        relay.add_message_handler(tx);

        let frame = CommandAck {
            command: 511,
            result: 0,
        }
        .into_frame();
        let bytes = FrameEncoder::new().encode(&frame).unwrap();
        client.write_all(&bytes).unwrap();

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received.message_id, CommandAck::ID);
    }

    #[test]
    fn test_outbound_frames_hit_the_wire() {
        let (server, mut client) = connected_pair();
        let relay = TcpMessageRelay::start(server).unwrap();

        relay.enqueue_message(
            SystemTime {
                time_unix_usec: 42,
                time_boot_ms: 1,
            }
            .into_frame(),
        );

        client
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let mut buf = [0u8; 128];
        let n = client.read(&mut buf).unwrap();
        let frames = FrameDecoder::new().push(&buf[..n]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].message_id, SystemTime::ID);
    }

    #[test]
    fn test_connection_close_is_observed() {
        let (server, client) = connected_pair();
        let relay = TcpMessageRelay::start(server).unwrap();
        assert!(relay.connection_open());

        drop(client);
        for _ in 0..100 {
            if !relay.connection_open() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("relay never noticed the closed connection");
    }

    #[test]
    fn test_closed_relay_drops_outbound() {
        let (server, client) = connected_pair();
        let relay = TcpMessageRelay::start(server).unwrap();
        drop(client);
        while relay.connection_open() {
            thread::sleep(Duration::from_millis(10));
        }

        // Must not panic or block
        relay.enqueue_message(
            HilGps {
                time_usec: 0,
                lat: 0,
                lon: 0,
                alt: 0,
                eph: 30,
                epv: 40,
                vel: 0,
                vn: 0,
                ve: 0,
                vd: 0,
                cog: 0,
                fix_type: 3,
                satellites_visible: 255,
                id: 0,
                yaw: 1,
            }
            .into_frame(),
        );
    }
}
