// ── UI surface port ──
//
// What the core may do to the UI. Calls are fire-and-forget and must not
// block; implementations typically forward into their own event loop.

use crate::notice::Notice;

/// The visible side of the console as seen by the core.
pub trait Surface: Send + Sync {
    /// Show a one-shot notice (alert, response panel or toast).
    fn notify(&self, notice: Notice);

    /// Cover the whole UI with a blocking "please wait" overlay.
    fn mask(&self, message: &str);

    /// Remove the overlay installed by [`mask`](Self::mask).
    fn unmask(&self);

    /// Discard all client state and start over from a fresh inventory.
    fn reload(&self);
}
