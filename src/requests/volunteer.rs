use serde::Deserialize;

use crate::models::volunteer::VolunteerStatus;

/// Admin status patch body; the enum itself constrains the accepted values.
#[derive(Debug, Deserialize)]
pub struct VolunteerStatusRequest {
    pub status: VolunteerStatus,
}
