//! [`Supplier`] definitions.

use common::Percent;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Company fulfilling orders, as seen by administrators.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Supplier {
    /// ID of the supplier [`User`].
    pub id: user::Id,

    /// Company name of this [`Supplier`].
    pub company: String,

    /// Contact person of this [`Supplier`], if known.
    pub contact: Option<String>,

    /// Contact email of this [`Supplier`], if known.
    pub email: Option<user::Email>,

    /// Number of deliveries made no later than promised.
    pub on_time_deliveries: u64,

    /// Number of deliveries made later than promised.
    pub late_deliveries: u64,

    /// Quality rating of the supplied goods, if rated.
    pub quality: Option<Percent>,

    /// Cost efficiency rating, if rated.
    pub cost_efficiency: Option<Percent>,

    /// Precomputed performance score reported by the API, if any.
    pub performance_score: Option<Percent>,
}
