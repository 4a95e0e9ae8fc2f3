use tracing::{debug, warn};

use crate::fragment::{FragmentError, ModalQuery};
use crate::modal::WallpaperModal;
use crate::page::Activation;
use crate::sanitize::{self, FragmentPolicy};

/// One issued request: the query plus the sequence tag that decides whether
/// its completion is still current when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    seq: u64,
    query: ModalQuery,
}

impl PendingLoad {
    pub fn query(&self) -> &ModalQuery {
        &self.query
    }
}

/// What `complete` did with a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Body applied to the content region, modal shown.
    Applied,
    /// Failure recorded on the modal's error region; content and
    /// visibility untouched.
    Failed,
    /// A newer request was initiated after this one; result discarded.
    Stale,
}

/// Per-activation state machine: Idle -> AwaitingResponse -> Idle.
///
/// Several requests may be in flight at once; only the most-recently
/// initiated one is allowed to touch the modal when it completes.
pub struct ModalLoader {
    policy: FragmentPolicy,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl ModalLoader {
    pub fn new(policy: FragmentPolicy) -> Self {
        ModalLoader {
            policy,
            next_seq: 0,
            latest_seq: None,
        }
    }

    /// Start a load for one activation. Identifiers pass through unmodified.
    pub fn begin(&mut self, activation: Activation) -> PendingLoad {
        self.next_seq += 1;
        self.latest_seq = Some(self.next_seq);
        let query = ModalQuery::from(activation);
        debug!(seq = self.next_seq, ?query, "modal load started");
        PendingLoad {
            seq: self.next_seq,
            query,
        }
    }

    /// Apply a finished request to the modal.
    ///
    /// The modal is shown unconditionally on success, including for an empty
    /// body. A failure never changes content or visibility; it is surfaced on
    /// the modal's error region and logged.
    pub fn complete(
        &mut self,
        modal: &mut WallpaperModal,
        pending: PendingLoad,
        result: Result<String, FragmentError>,
    ) -> LoadOutcome {
        if self.latest_seq != Some(pending.seq) {
            debug!(seq = pending.seq, "dropping stale modal load result");
            return LoadOutcome::Stale;
        }
        self.latest_seq = None;

        match result {
            Ok(body) => {
                modal.set_content(sanitize::apply_policy(self.policy, &body));
                modal.show();
                debug!(seq = pending.seq, "modal content applied");
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(seq = pending.seq, error = %err, "modal load failed");
                modal.set_error(err.to_string());
                LoadOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activation(wallpaper: &str) -> Activation {
        Activation {
            wallpaper_id: Some(wallpaper.to_string()),
            collection_id: None,
        }
    }

    #[test]
    fn success_applies_body_and_shows_modal() {
        let mut loader = ModalLoader::new(FragmentPolicy::Trusted);
        let mut modal = WallpaperModal::new();

        let pending = loader.begin(activation("42"));
        let outcome = loader.complete(&mut modal, pending, Ok("<div>Wallpaper 42</div>".to_string()));

        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(modal.content(), "<div>Wallpaper 42</div>");
        assert!(modal.is_visible());
    }

    #[test]
    fn empty_body_still_shows_modal() {
        let mut loader = ModalLoader::new(FragmentPolicy::Trusted);
        let mut modal = WallpaperModal::new();

        let pending = loader.begin(activation("42"));
        loader.complete(&mut modal, pending, Ok(String::new()));

        assert_eq!(modal.content(), "");
        assert!(modal.is_visible());
    }

    #[test]
    fn failure_leaves_modal_untouched() {
        let mut loader = ModalLoader::new(FragmentPolicy::Trusted);
        let mut modal = WallpaperModal::new();
        modal.set_content("<div>previous</div>".to_string());

        let pending = loader.begin(activation("42"));
        let outcome = loader.complete(
            &mut modal,
            pending,
            Err(FragmentError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        );

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(modal.content(), "<div>previous</div>");
        assert!(!modal.is_visible());
        assert!(modal.error().unwrap().contains("503"));
    }

    #[test]
    fn stale_result_arriving_late_is_discarded() {
        let mut loader = ModalLoader::new(FragmentPolicy::Trusted);
        let mut modal = WallpaperModal::new();

        let first = loader.begin(activation("1"));
        let second = loader.begin(activation("2"));

        // Second request resolves first and wins.
        assert_eq!(
            loader.complete(&mut modal, second, Ok("<div>two</div>".to_string())),
            LoadOutcome::Applied
        );
        // First resolves afterwards and must not overwrite the newer result.
        assert_eq!(
            loader.complete(&mut modal, first, Ok("<div>one</div>".to_string())),
            LoadOutcome::Stale
        );
        assert_eq!(modal.content(), "<div>two</div>");
    }

    #[test]
    fn stale_result_arriving_early_is_discarded() {
        let mut loader = ModalLoader::new(FragmentPolicy::Trusted);
        let mut modal = WallpaperModal::new();

        let first = loader.begin(activation("1"));
        let second = loader.begin(activation("2"));

        // In-order arrival: the superseded request completes first.
        assert_eq!(
            loader.complete(&mut modal, first, Ok("<div>one</div>".to_string())),
            LoadOutcome::Stale
        );
        assert_eq!(modal.content(), "");
        assert_eq!(
            loader.complete(&mut modal, second, Ok("<div>two</div>".to_string())),
            LoadOutcome::Applied
        );
        assert_eq!(modal.content(), "<div>two</div>");
    }

    #[test]
    fn clean_policy_sanitizes_before_injection() {
        let mut loader = ModalLoader::new(FragmentPolicy::Clean);
        let mut modal = WallpaperModal::new();

        let pending = loader.begin(activation("42"));
        loader.complete(
            &mut modal,
            pending,
            Ok("<div onclick=\"x()\">ok</div><script>x()</script>".to_string()),
        );

        assert_eq!(modal.content(), "<div>ok</div>");
    }
}
