//! The betting slip: the user's in-progress selections and stakes.
//!
//! A [`BetSlip`] is plain owned state. Create one per session and pass it
//! to whatever needs it; nothing here is global. Submission validates the
//! slip locally before any request is made, then sends one bet per staked
//! selection through a gateway processor such as [`HttpBetGateway`].

pub mod store;
pub mod submission;

pub use store::{BetSlip, SlipError};
pub use submission::{
    AccountSnapshot, BetRejection, BetSubmitter, HttpBetGateway, RejectedSelection,
    SubmissionError, SubmissionReport, prepare_submission,
};
