//! End-to-end flows: keys in, protocol out, interpreter replies, screen.

mod common;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use common::{pump_until, runner, screen, TestRunner};
use rideterm::tui::overlay::Overlay;
use rideterm::tui::PaneKind;

fn press(runner: &mut TestRunner, code: KeyCode) {
    runner.handle_terminal_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn type_str(runner: &mut TestRunner, text: &str) {
    for ch in text.chars() {
        press(runner, KeyCode::Char(ch));
    }
}

fn leader(runner: &mut TestRunner, ch: char) {
    runner.handle_terminal_event(&Event::Key(KeyEvent::new(KeyCode::Char(']'), KeyModifiers::CONTROL)));
    press(runner, KeyCode::Char(ch));
}

#[test]
fn test_execute_renders_result() {
    let (mut runner, mut peer) = runner();

    type_str(&mut runner, "1+1");
    press(&mut runner, KeyCode::Enter);
    runner.flush().unwrap();

    let execute = peer.expect("Execute");
    assert_eq!(execute.arg("text").as_str(), Some("1+1\n"));

    peer.send(r#"["AppendSessionOutput",{"result":"      1+1\n","type":14}]"#);
    peer.send(r#"["AppendSessionOutput",{"result":"2\n","type":2}]"#);
    peer.send(r#"["SetPromptType",{"type":1}]"#);
    pump_until(&mut runner, |app| app.ws().tracer.is_ready());
    runner.render().unwrap();

    assert_eq!(runner.app().ws().transcript.lines(), ["      1+1", "2"]);
    let rows = screen(&runner);
    assert!(rows.iter().any(|r| r.trim_matches(|c| c == '║' || c == '│').trim() == "2"));
    assert!(rows[0].contains("session"));
}

#[test]
fn test_breakpoint_survives_close_and_reaches_frame() {
    let (mut runner, mut peer) = runner();

    peer.send(r#"["OpenWindow",{"token":1,"name":"B","text":["B","x←1","x"],"debugger":0}]"#);
    pump_until(&mut runner, |app| app.panes().focused_kind() == PaneKind::Editor);

    press(&mut runner, KeyCode::Down);
    leader(&mut runner, 'b');
    press(&mut runner, KeyCode::Esc);
    runner.flush().unwrap();

    let attrs = peer.expect("SetLineAttributes");
    assert_eq!(attrs.arg("win").as_i64(), Some(1));
    let stop: Vec<i64> = attrs
        .arg("stop")
        .as_list()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_i64())
        .collect();
    assert_eq!(stop, [1]);
    assert_eq!(peer.expect("CloseWindow").arg("win").as_i64(), Some(1));
    assert_eq!(runner.app().panes().focused_kind(), PaneKind::Session);

    peer.send(r#"["CloseWindow",{"win":1}]"#);
    type_str(&mut runner, "B");
    press(&mut runner, KeyCode::Enter);
    runner.flush().unwrap();
    peer.expect("Execute");

    // The interpreter reports no stops; the remembered breakpoint wins.
    peer.send(r#"["OpenWindow",{"token":2,"name":"B","text":["B","x←1","x"],"debugger":1,"currentRow":1,"stop":[]}]"#);
    pump_until(&mut runner, |app| !app.ws().tracer.frames().is_empty());

    let frame = runner.app().ws().tracer.top().unwrap();
    assert_eq!(frame.window.current_line(), Some(1));
    assert!(frame.window.has_breakpoint(1));
    assert_eq!(runner.app().panes().focused_kind(), PaneKind::Editor);

    runner.render().unwrap();
    assert!(screen(&runner).iter().any(|r| r.contains("B [tracer]")));
}

#[test]
fn test_autocomplete_popup_selects_first() {
    let (mut runner, mut peer) = runner();

    type_str(&mut runner, "alp");
    press(&mut runner, KeyCode::Tab);
    runner.flush().unwrap();

    let request = peer.expect("GetAutocomplete");
    assert_eq!(request.arg("line").as_str(), Some("alp"));
    assert_eq!(request.arg("pos").as_i64(), Some(3));
    let token = request.arg("token").as_i64().unwrap();

    peer.send(&format!(
        r#"["ReplyGetAutocomplete",{{"options":["alpine","alpha","alphabet","beta"],"skip":3,"token":{token}}}]"#
    ));
    pump_until(&mut runner, |app| app.panes().overlay().is_some());

    let Some(Overlay::Autocomplete { state, .. }) = runner.app().panes().overlay() else {
        panic!("expected completion popup");
    };
    assert_eq!(state.candidates(), ["alpha", "alphabet", "alpine"]);

    runner.render().unwrap();
    assert!(screen(&runner).iter().any(|r| r.contains("alphabet")));

    press(&mut runner, KeyCode::Enter);
    assert!(runner.app().panes().overlay().is_none());
    assert_eq!(runner.app().panes().session().input(), "alpha");
}

#[test]
fn test_disconnect_ends_runner() {
    let (mut runner, peer) = runner();
    drop(peer);
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
    loop {
        assert!(std::time::Instant::now() < deadline, "disconnect not reported");
        if runner.process_inbound().is_err() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}
