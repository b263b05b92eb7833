//! Network collaborators: the negotiation backend and the mailing-list provider.

pub mod api;
pub mod waitlist;
