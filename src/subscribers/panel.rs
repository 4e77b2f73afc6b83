//! Stdout presentation panel.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Prints status dumps and alarm banners to stdout.
///
/// This is the terminal rendition of the coach display: status reports are
/// printed verbatim, alarm-class events as one-line banners.
pub struct StatusPanel;

#[async_trait]
impl Subscribe for StatusPanel {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::StatusReport => {
                if let Some(text) = &ev.detail {
                    println!("{text}");
                }
            }
            EventKind::FireAlert
            | EventKind::PassengerEmergency
            | EventKind::ChainPull
            | EventKind::PowerLow => {
                if let Some(banner) = &ev.detail {
                    match ev.cabin {
                        Some(cabin) => println!("!!! {banner} (cabin {cabin})"),
                        None => println!("!!! {banner}"),
                    }
                }
            }
            _ => {}
        }
    }
}
