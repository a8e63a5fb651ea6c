pub mod midi;

#[cfg(test)]
mod test {
    use super::midi::MidiSenderController;
    use crate::midi::MidiSending;
    use std::{cell::RefCell, rc::Rc};

    const PORT_NAMES: &[&str] = &["dev0", "dev1", "dev2"];

    #[derive(Default)]
    struct Transport {
        ports: Vec<String>,
        supports_virtual: bool,
        is_open: bool,
        opened_label: Option<String>,
        times_closed: usize,
        sent: Vec<Vec<u8>>,
    }

    #[derive(Default, Clone)]
    struct MockMidiSender {
        transport: Rc<RefCell<Transport>>,
    }

    impl MockMidiSender {
        fn with_ports(names: &[&str]) -> Self {
            Self {
                transport: Rc::new(RefCell::new(Transport {
                    ports: names.iter().map(|s| s.to_string()).collect(),
                    supports_virtual: true,
                    ..Transport::default()
                })),
            }
        }
    }

    impl MidiSending for MockMidiSender {
        fn port_count(&self) -> usize {
            self.transport.borrow().ports.len()
        }

        fn port_name(&self, index: usize) -> Option<String> {
            self.transport.borrow().ports.get(index).cloned()
        }

        fn open_port(&mut self, index: usize, label: &str) -> anyhow::Result<String> {
            let mut transport = self.transport.borrow_mut();
            let Some(name) = transport.ports.get(index).cloned() else {
                anyhow::bail!("no output port at index {index}");
            };

            transport.opened_label = Some(label.to_owned());
            transport.is_open = true;
            Ok(name)
        }

        fn open_virtual_port(&mut self, _name: &str) -> anyhow::Result<()> {
            let mut transport = self.transport.borrow_mut();
            if !transport.supports_virtual {
                anyhow::bail!("virtual ports are not supported on this platform");
            }

            transport.is_open = true;
            Ok(())
        }

        fn close_port(&mut self) {
            let mut transport = self.transport.borrow_mut();
            if transport.is_open {
                transport.is_open = false;
                transport.times_closed += 1;
            }
        }

        fn send_message(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
            let mut transport = self.transport.borrow_mut();
            if !transport.is_open {
                anyhow::bail!("no open output connection");
            }

            transport.sent.push(bytes.to_vec());
            Ok(())
        }
    }

    fn controller(mock: &MockMidiSender) -> MidiSenderController {
        MidiSenderController::new(Box::new(mock.clone()), "Test")
    }

    #[test]
    fn starts_closed() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let sender = controller(&mock);

        assert!(!sender.is_open());
        assert!(!sender.is_virtual_port());
        assert_eq!(sender.current_port(), None);
        assert_eq!(sender.current_name(), None);
    }

    #[test]
    fn ports_are_listed_in_index_order() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let sender = controller(&mock);

        assert_eq!(sender.port_count(), PORT_NAMES.len());
        assert_eq!(sender.list_ports(), PORT_NAMES);
    }

    #[test]
    fn invalid_port_indices_have_empty_names() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let sender = controller(&mock);

        assert_eq!(sender.port_name(PORT_NAMES.len()), "");
    }

    #[test_log::test]
    fn opening_a_port_records_the_connection() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        assert!(sender.open(1));
        assert!(sender.is_open());
        assert!(!sender.is_virtual_port());
        assert_eq!(sender.current_port(), Some(1));
        assert_eq!(sender.current_name(), Some("dev1"));
        assert_eq!(
            mock.transport.borrow().opened_label.as_deref(),
            Some("TestOutput 1")
        );
    }

    #[test_log::test]
    fn opening_fails_when_no_ports_are_available() {
        let mock = MockMidiSender::default();
        let mut sender = controller(&mock);

        assert_eq!(sender.port_count(), 0);
        assert!(!sender.open(0));
        assert!(!sender.is_open());
        assert_eq!(sender.current_port(), None);
    }

    #[test]
    fn reopening_closes_the_previous_connection_first() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        assert!(sender.open(0));
        assert!(sender.open(1));

        assert_eq!(mock.transport.borrow().times_closed, 1);
        assert_eq!(sender.current_port(), Some(1));
        assert_eq!(sender.current_name(), Some("dev1"));
    }

    #[test]
    fn opening_virtual_closes_the_real_port_first() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        assert!(sender.open(0));
        assert!(sender.open_virtual("MyApp"));

        assert_eq!(mock.transport.borrow().times_closed, 1);
        assert!(sender.is_open());
        assert!(sender.is_virtual_port());
        assert_eq!(sender.current_port(), None);
        assert_eq!(sender.current_name(), Some("MyApp"));
    }

    #[test_log::test]
    fn unsupported_virtual_ports_leave_the_connection_closed() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        mock.transport.borrow_mut().supports_virtual = false;
        let mut sender = controller(&mock);

        assert!(!sender.open_virtual("MyApp"));
        assert!(!sender.is_open());
        assert!(!sender.is_virtual_port());
        assert_eq!(sender.current_name(), None);
    }

    #[test]
    fn close_resets_the_connection_state() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        assert!(sender.open(0));
        sender.close();

        assert!(!sender.is_open());
        assert_eq!(sender.current_port(), None);
        assert_eq!(sender.current_name(), None);
        assert_eq!(mock.transport.borrow().times_closed, 1);
    }

    #[test]
    fn close_is_idempotent() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        sender.close();
        assert!(!sender.is_open());

        assert!(sender.open(0));
        sender.close();
        sender.close();

        assert!(!sender.is_open());
        assert_eq!(mock.transport.borrow().times_closed, 1);
    }

    #[test]
    fn dropping_the_controller_closes_the_port() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);

        {
            let mut sender = controller(&mock);
            assert!(sender.open(0));
        }

        assert_eq!(mock.transport.borrow().times_closed, 1);
    }

    #[test]
    fn semantic_sends_reach_the_transport() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);
        assert!(sender.open(0));

        sender.send_note_on(1, 60, 100);
        sender.send_note_off(1, 60, 0);
        sender.send_control_change(2, 7, 127);
        sender.send_program_change(3, 42);
        sender.send_aftertouch(4, 90);
        sender.send_poly_aftertouch(5, 61, 40);

        assert_eq!(
            mock.transport.borrow().sent,
            vec![
                vec![0x90, 60, 100],
                vec![0x80, 60, 0],
                vec![0xB1, 7, 127],
                vec![0xC2, 42],
                vec![0xD3, 90],
                vec![0xA4, 61, 40],
            ]
        );
    }

    #[test]
    fn raw_sends_are_passed_through_unvalidated() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);
        assert!(sender.open(0));

        sender.send_bytes(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(mock.transport.borrow().sent, vec![vec![0xFF, 0xFF, 0xFF]]);
    }

    #[test]
    fn pitch_bends_are_split_into_seven_bit_pairs() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);
        assert!(sender.open(0));

        sender.send_pitch_bend(1, 8192);
        assert_eq!(mock.transport.borrow().sent, vec![vec![0xE0, 0x00, 0x40]]);
    }

    #[test_log::test]
    fn oversized_pitch_bends_are_still_sent_masked() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);
        assert!(sender.open(0));

        sender.send_pitch_bend(1, 16384 + 5);
        assert_eq!(mock.transport.borrow().sent, vec![vec![0xE0, 0x05, 0x00]]);
    }

    #[test_log::test]
    fn sends_while_closed_are_dropped() {
        let mock = MockMidiSender::with_ports(PORT_NAMES);
        let mut sender = controller(&mock);

        sender.send_note_on(1, 60, 100);

        assert!(mock.transport.borrow().sent.is_empty());
        assert!(!sender.is_open());
    }
}
