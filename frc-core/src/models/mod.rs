mod irrf_bracket;
mod notary;
mod payment;

pub use irrf_bracket::{IrrfBracket, NewIrrfBracket};
pub use notary::{NewNotary, Notary, NotaryStatus, ResponsibleRole};
pub use payment::{HistoryType, NewPayment, Payment, PaymentStatus};
