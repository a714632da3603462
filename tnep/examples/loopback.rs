// Poller and tag engines linked through one in-memory NDEF area.
//
// The tag offers an echo service; the poller selects it, sends a text
// record and prints the answer. Run with RUST_LOG=debug to follow both
// state machines.

use std::sync::mpsc::{self, Sender};

use tnep::prelude::*;
use tnep::protocol::codec;

/// Tag-side service forwarding every request to the main loop.
struct Echo {
    requests: Sender<Vec<u8>>,
}

impl ServiceHandler for Echo {
    fn message_received(&mut self, message: &[u8]) {
        let _ = self.requests.send(message.to_vec());
    }
}

/// Poller-side service printing what comes back.
struct Printer;

impl ServiceHandler for Printer {
    fn selected(&mut self) -> Status {
        println!("echo service selected");
        Status::SUCCESS
    }

    fn message_received(&mut self, message: &[u8]) {
        match codec::parse_message(message, 16) {
            Ok(msg) => {
                for rec in msg.records() {
                    if let Some(text) = rec.text_content() {
                        println!("answer: {}", text);
                    }
                }
            }
            Err(e) => println!("unreadable answer: {}", e),
        }
    }

    fn deselected(&mut self) {
        println!("echo service deselected");
    }

    fn timeout(&mut self) {
        println!("tag did not answer in time");
    }
}

fn echo_param() -> Result<ServiceParam> {
    Ok(ServiceParam::new(Uri::try_from("urn:nfc:sn:echo")?, 8, 4))
}

fn main() -> Result<()> {
    env_logger::init();

    let config = EngineConfig::builder()
        .process_timeout(ms(5))
        .build()?;
    let area = NdefBuffer::new(config.max_message_size);

    let (requests, incoming) = mpsc::channel();
    let mut tag = Tag::with_config(config.clone());
    tag.register_tx_buffer(area.clone())?;
    tag.init(vec![Service::new(echo_param()?, Box::new(Echo { requests }))])?;

    let mut poller = Poller::with_config(config);
    poller.register_rx_buffer(area.clone())?;
    poller.init(
        vec![Service::new(echo_param()?, Box::new(Printer))],
        Some(Box::new(tag.indicator()?)),
    )?;
    println!("tag area: {}", bytes_to_hex_spaced(&area.snapshot()));

    poller.select_service(0)?;
    let mut sent = false;
    for _ in 0..200 {
        for result in [poller.process(), tag.process()] {
            if let Err(e) = result {
                if !e.is_timeout() {
                    return Err(e);
                }
            }
        }

        if poller.state() == State::ServiceSelected && !sent {
            poller.send(Record::text("en", "hello tag")?)?;
            sent = true;
        }

        if let Ok(request) = incoming.try_recv() {
            let msg = codec::parse_message(&request, 16)?;
            let text = msg
                .records()
                .iter()
                .find_map(Record::text_content)
                .unwrap_or_default();
            tag.tx_msg_app_data(Record::text("en", &format!("echo: {}", text))?)?;
            tag.tx_msg_app_data(codec::build_status_record(Status::SUCCESS))?;
        }

        if sent && poller.state() == State::ServiceReady {
            break;
        }
    }

    // let the tag see the final deselect
    let _ = tag.process();
    println!("tag state: {}", tag.state());
    Ok(())
}
