use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::time::timeout;

use vivelink_common::codec;
use vivelink_common::{ControllerSnapshot, FrameSnapshot, Hand, Shutdown, Vector3};
use vivelink_receiver::consumer::frame_slot;
use vivelink_receiver::display::{TextMode, CLEAR_SCREEN};
use vivelink_receiver::visualizer::scene::palette;
use vivelink_receiver::{
    Consumer, ReceiverLoop, RecordingScene, TextDisplay, TrailVisualizer, VisualizerConfig,
};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    fn screens(&self) -> Vec<String> {
        self.text()
            .split(CLEAR_SCREEN)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn static_frame(t: f64) -> FrameSnapshot {
    let mut left = ControllerSnapshot {
        tracked: true,
        position: Vector3::new(0.1, 0.2, 0.3),
        ..Default::default()
    };
    left.buttons.trigger = true;
    left.analog.trigger = 1.0;
    FrameSnapshot::new(left, ControllerSnapshot::default(), t)
}

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

async fn send(socket: &UdpSocket, to: SocketAddr, frame: &FrameSnapshot) {
    let bytes = codec::encode(frame).unwrap();
    socket.send_to(&bytes, to).await.unwrap();
}

async fn wait_for_screens(out: &SharedBuf, n: usize) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while out.screens().len() < n {
        assert!(Instant::now() < deadline, "only {} screens rendered", out.screens().len());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn simple_mode_shows_static_trigger_held_controller() {
    let out = SharedBuf::default();
    let display = TextDisplay::new(TextMode::Simple, false, Box::new(out.clone()));
    let receiver = ReceiverLoop::bind(loopback(), Consumer::Text(display)).unwrap();
    let addr = receiver.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(receiver.run(shutdown.subscribe()));

    let sender = UdpSocket::bind(loopback()).await.unwrap();
    for t in [1.0, 1.016, 1.033] {
        send(&sender, addr, &static_frame(t)).await;
    }
    wait_for_screens(&out, 3).await;

    shutdown.trigger();
    let stats = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert_eq!(stats.received, 3);
    assert_eq!(stats.dispatched, 3);

    let screens = out.screens();
    assert_eq!(screens.len(), 3);
    for screen in &screens {
        assert!(screen.contains("Position: X=0.1000, Y=0.2000, Z=0.3000"), "{screen}");
        assert!(screen.contains("Trigger: PRESSED"));
        assert!(screen.contains("RIGHT CONTROLLER: Not tracked"));
    }
}

#[tokio::test]
async fn visualizer_trail_holds_three_identical_points_in_active_colour() {
    let (slot, mut reader) = frame_slot();
    let receiver = ReceiverLoop::bind(loopback(), Consumer::Visualize(slot)).unwrap();
    let addr = receiver.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(receiver.run(shutdown.subscribe()));

    let mut vis = TrailVisualizer::new(VisualizerConfig::default());
    let mut scene = RecordingScene::new();
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    for t in [1.0, 1.016, 1.033] {
        send(&sender, addr, &static_frame(t)).await;
        let frame = timeout(Duration::from_secs(2), reader.next()).await.unwrap().unwrap();
        assert_eq!(frame.timestamp, t);
        let now = Instant::now();
        vis.apply(&frame, now);
        vis.render(&mut scene, now);
    }

    shutdown.trigger();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();

    let trail = vis.hand(Hand::Left).trail.to_vec();
    assert_eq!(trail, vec![Vector3::new(0.1, 0.2, 0.3); 3]);

    let drawn = scene.last_frame().unwrap();
    assert_eq!(drawn.marker(Hand::Left).unwrap().color, palette::ACTIVE);
    assert_eq!(drawn.path(Hand::Left).unwrap().0.len(), 3);
    assert!(drawn.grid.is_some());
}

#[tokio::test]
async fn dropped_and_malformed_datagrams_do_not_stop_the_loop() {
    let out = SharedBuf::default();
    let display = TextDisplay::new(TextMode::Full, false, Box::new(out.clone()));
    let receiver = ReceiverLoop::bind(loopback(), Consumer::Text(display)).unwrap();
    let addr = receiver.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(receiver.run(shutdown.subscribe()));
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    // Frame 2 is "lost"; garbage and a truncated frame arrive instead.
    send(&sender, addr, &static_frame(1.0)).await;
    sender.send_to(b"definitely not a frame", addr).await.unwrap();
    let truncated = codec::encode(&static_frame(2.0)).unwrap();
    sender.send_to(&truncated[..truncated.len() / 2], addr).await.unwrap();
    send(&sender, addr, &static_frame(3.0)).await;
    send(&sender, addr, &static_frame(4.0)).await;

    wait_for_screens(&out, 3).await;
    shutdown.trigger();
    let stats = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();

    assert_eq!(stats.received, 5);
    assert_eq!(stats.decode_failures, 2);
    assert_eq!(stats.dispatched, 3);

    let stamps: Vec<String> = out
        .screens()
        .iter()
        .filter_map(|s| s.lines().find(|l| l.starts_with("Timestamp:")).map(str::to_string))
        .collect();
    assert_eq!(stamps, vec!["Timestamp: 1.000", "Timestamp: 3.000", "Timestamp: 4.000"]);
}

#[tokio::test]
async fn out_of_order_frames_are_shown_in_arrival_order() {
    let (slot, mut reader) = frame_slot();
    let receiver = ReceiverLoop::bind(loopback(), Consumer::Visualize(slot)).unwrap();
    let addr = receiver.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(receiver.run(shutdown.subscribe()));
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    let mut seen = Vec::new();
    for t in [5.0, 3.0, 4.0] {
        send(&sender, addr, &static_frame(t)).await;
        let frame = timeout(Duration::from_secs(2), reader.next()).await.unwrap().unwrap();
        seen.push(frame.timestamp);
    }

    shutdown.trigger();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert_eq!(seen, vec![5.0, 3.0, 4.0]);
}

#[tokio::test]
async fn unknown_fields_are_ignored_on_the_wire() {
    let (slot, mut reader) = frame_slot();
    let receiver = ReceiverLoop::bind(loopback(), Consumer::Visualize(slot)).unwrap();
    let addr = receiver.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(receiver.run(shutdown.subscribe()));
    let sender = UdpSocket::bind(loopback()).await.unwrap();

    let mut value = serde_json::to_value(static_frame(9.0)).unwrap();
    value["sequence"] = serde_json::json!(42);
    value["left"]["battery"] = serde_json::json!(0.8);
    sender
        .send_to(&serde_json::to_vec(&value).unwrap(), addr)
        .await
        .unwrap();

    let frame = timeout(Duration::from_secs(2), reader.next()).await.unwrap().unwrap();
    assert_eq!(frame, static_frame(9.0));

    shutdown.trigger();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
}
