// Client-side loader for the wallpaper gallery detail modal: delegated
// activations on trigger elements fetch an HTML fragment from the gallery
// server and apply it to the modal host.

pub mod cli;
pub mod config;
pub mod fragment;
pub mod loader;
pub mod modal;
pub mod page;
pub mod sanitize;

// Re-export the types the binary and the integration tests drive.
pub use config::{load_config, Config, ConfigError};
pub use fragment::{
    FragmentApi, FragmentError, HttpFragmentApi, MockFragmentApi, ModalQuery, MODAL_FRAGMENT_PATH,
};
pub use loader::{LoadOutcome, ModalLoader, PendingLoad};
pub use modal::WallpaperModal;
pub use page::{Activation, Document, Element, DEFAULT_TRIGGER_CLASS};
pub use sanitize::FragmentPolicy;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Page events consumed by the modal event loop. Serializable so the demo
/// binary can replay a scripted page session from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    AddElement { element: Element },
    RemoveElement { id: String },
    Click { id: String },
}

/// Drive the modal loader over a stream of page events.
///
/// A single consumer task owns the document and the modal, matching the
/// host environment's single-threaded UI loop. Each activation dispatches
/// one fetch onto a blocking task; completions come back over a channel and
/// are applied in arrival order, with [`ModalLoader`] deciding whether a
/// completion is still current. Returns the modal once the event stream is
/// closed and every in-flight request has completed.
pub async fn run_modal_loop(
    api: Arc<dyn FragmentApi>,
    mut document: Document,
    mut modal: WallpaperModal,
    policy: FragmentPolicy,
    mut events: mpsc::Receiver<PageEvent>,
) -> WallpaperModal {
    let mut loader = ModalLoader::new(policy);
    let (done_tx, mut done_rx) = mpsc::channel::<(PendingLoad, Result<String, FragmentError>)>(16);

    let mut events_open = true;
    let mut in_flight = 0usize;

    while events_open || in_flight > 0 {
        tokio::select! {
            event = events.recv(), if events_open => {
                match event {
                    Some(PageEvent::Click { id }) => {
                        if let Some(activation) = document.click(&id) {
                            let pending = loader.begin(activation);
                            let api = Arc::clone(&api);
                            let done_tx = done_tx.clone();
                            in_flight += 1;
                            tokio::task::spawn_blocking(move || {
                                let result = api.load_modal_fragment(pending.query());
                                // Loop gone means nobody is left to apply the result.
                                let _ = done_tx.blocking_send((pending, result));
                            });
                        }
                    }
                    Some(PageEvent::AddElement { element }) => document.insert(element),
                    Some(PageEvent::RemoveElement { id }) => document.remove(&id),
                    None => events_open = false,
                }
            },
            completed = done_rx.recv(), if in_flight > 0 => {
                if let Some((pending, result)) = completed {
                    in_flight -= 1;
                    loader.complete(&mut modal, pending, result);
                }
            }
        }
    }

    modal
}
