//! Core types shared by the container response and its encoders.
//!
//! - **Message Handling** ([`Message`], [`PayloadItem`], [`PayloadSize`]): the frames a
//!   committed response is written as
//! - **Response Head** ([`ResponseHead`]): the status line and headers of a response
//! - **Cookies** ([`Cookie`]): the container's native cookie
//! - **Error Handling** ([`ResponseError`], [`SendError`])

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod response;
pub use response::ResponseHead;

mod cookie;
pub use cookie::Cookie;
pub use cookie::SESSION_MAX_AGE;

mod error;
pub use error::ResponseError;
pub use error::SendError;
