use time::OffsetDateTime;

/// A named physical counter.
///
/// `meter_number` is the stable external identifier and the key every
/// [`Reading::meter_id`](super::Reading::meter_id) refers to. `id` is the
/// store's own document id and is never used for joins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Meter {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    pub name: String,
    pub meter_number: String,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub created_at: OffsetDateTime,
}

impl Meter {
    pub fn new(
        name: impl Into<String>,
        meter_number: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            meter_number: meter_number.into(),
            created_at,
        }
    }
}

/// Resolve a meter number to its display name.
pub(crate) fn display_name<'a>(meters: &'a [Meter], meter_number: &str) -> Option<&'a str> {
    meters
        .iter()
        .find(|m| m.meter_number == meter_number)
        .map(|m| m.name.as_str())
}
