//! Shipment aggregate, tracking numbers and the status set.
//!
//! Status assignment is flat: an authorised update may move a shipment to any
//! status in [`ShipmentStatus::ASSIGNABLE`], whatever its current status is.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// `chrono` format producing `YYYYMMDDThhmmss.nnnnnnnnn`.
const TRACKING_NUMBER_FORMAT: &str = "%Y%m%dT%H%M%S%.9f";

/// Length of a tracking number minted by [`TrackingNumber::from_instant`].
pub const TRACKING_NUMBER_LEN: usize = 25;

/// Stable shipment identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(Uuid);

impl ShipmentId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised by shipment value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShipmentValidationError {
    /// A required text field was blank after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Offending field.
        field: ShipmentField,
    },
    /// The tracking number was blank.
    #[error("tracking number must not be empty")]
    EmptyTrackingNumber,
}

/// Caller-supplied shipment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentField {
    /// Sender display name.
    SenderName,
    /// Sender postal address.
    SenderAddress,
    /// Receiver display name.
    ReceiverName,
    /// Receiver postal address.
    ReceiverAddress,
    /// Free-text description of the contents.
    ItemDescription,
}

impl ShipmentField {
    /// Field name as it appears in API payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SenderName => "senderName",
            Self::SenderAddress => "senderAddress",
            Self::ReceiverName => "receiverName",
            Self::ReceiverAddress => "receiverAddress",
            Self::ItemDescription => "itemDescription",
        }
    }
}

impl fmt::Display for ShipmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible shipment lookup key.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use shipments::domain::TrackingNumber;
///
/// let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// let number = TrackingNumber::from_instant(instant);
/// assert_eq!(number.as_str(), "20240309T070501.000000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Validate a tracking number supplied by a caller or the store.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ShipmentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ShipmentValidationError::EmptyTrackingNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Mint a tracking number from an instant with nanosecond precision.
    ///
    /// Uniqueness is not guaranteed here; the store's unique index is the
    /// authority.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.format(TRACKING_NUMBER_FORMAT).to_string())
    }

    /// Borrow the textual form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TrackingNumber> for String {
    fn from(value: TrackingNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for TrackingNumber {
    type Error = ShipmentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Shipment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// Initial status assigned at creation.
    Created,
    /// Handed to the carrier.
    Shipped,
    /// Moving through the carrier network.
    InTransit,
    /// Received by the consignee.
    Delivered,
    /// Withdrawn before delivery.
    Cancelled,
}

/// Error returned when a status string is not a known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shipment status: {value}")]
pub struct ParseShipmentStatusError {
    value: String,
}

impl ParseShipmentStatusError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl ShipmentStatus {
    /// Statuses an update may assign.
    pub const ASSIGNABLE: [Self; 4] = [
        Self::Shipped,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Shipped => "Shipped",
            Self::InTransit => "InTransit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether an update may set this status. `Created` is reserved for
    /// creation.
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::Created)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = ParseShipmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Shipped" => Ok(Self::Shipped),
            "InTransit" => Ok(Self::InTransit),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(ParseShipmentStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Unvalidated shipment fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentDetailsDraft {
    /// Name of the sending party.
    pub sender_name: String,
    /// Pickup address.
    pub sender_address: String,
    /// Name of the receiving party.
    pub receiver_name: String,
    /// Delivery address.
    pub receiver_address: String,
    /// Free-form description of the contents.
    pub item_description: String,
}

/// Immutable sender, receiver and contents of a shipment.
///
/// ## Invariants
/// - Every field is non-empty and carries no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentDetails {
    sender_name: String,
    sender_address: String,
    receiver_name: String,
    receiver_address: String,
    item_description: String,
}

fn required(value: String, field: ShipmentField) -> Result<String, ShipmentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShipmentValidationError::EmptyField { field });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl ShipmentDetails {
    /// Validate the caller-supplied fields.
    ///
    /// Fields are checked in declaration order; the first blank one is
    /// reported.
    ///
    /// # Examples
    /// ```
    /// use shipments::domain::{ShipmentDetails, ShipmentDetailsDraft};
    ///
    /// let details = ShipmentDetails::try_from_parts(ShipmentDetailsDraft {
    ///     sender_name: "A".into(),
    ///     sender_address: "Addr A".into(),
    ///     receiver_name: "B".into(),
    ///     receiver_address: "Addr B".into(),
    ///     item_description: " Box ".into(),
    /// })
    /// .expect("valid details");
    /// assert_eq!(details.item_description(), "Box");
    /// ```
    pub fn try_from_parts(draft: ShipmentDetailsDraft) -> Result<Self, ShipmentValidationError> {
        let ShipmentDetailsDraft {
            sender_name,
            sender_address,
            receiver_name,
            receiver_address,
            item_description,
        } = draft;

        Ok(Self {
            sender_name: required(sender_name, ShipmentField::SenderName)?,
            sender_address: required(sender_address, ShipmentField::SenderAddress)?,
            receiver_name: required(receiver_name, ShipmentField::ReceiverName)?,
            receiver_address: required(receiver_address, ShipmentField::ReceiverAddress)?,
            item_description: required(item_description, ShipmentField::ItemDescription)?,
        })
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn sender_address(&self) -> &str {
        &self.sender_address
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver_name
    }

    pub fn receiver_address(&self) -> &str {
        &self.receiver_address
    }

    pub fn item_description(&self) -> &str {
        &self.item_description
    }
}

/// A shipment ready to be inserted; the store assigns timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    id: ShipmentId,
    tracking_number: TrackingNumber,
    owner_id: UserId,
    details: ShipmentDetails,
}

impl NewShipment {
    /// Assemble an insert request. Status is always [`ShipmentStatus::Created`].
    pub const fn new(
        id: ShipmentId,
        tracking_number: TrackingNumber,
        owner_id: UserId,
        details: ShipmentDetails,
    ) -> Self {
        Self {
            id,
            tracking_number,
            owner_id,
            details,
        }
    }

    /// Surrogate identifier.
    pub const fn id(&self) -> ShipmentId {
        self.id
    }

    /// Public lookup key.
    pub const fn tracking_number(&self) -> &TrackingNumber {
        &self.tracking_number
    }

    /// User who created the shipment.
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Sender, receiver and contents.
    pub const fn details(&self) -> &ShipmentDetails {
        &self.details
    }

    /// Status every new shipment starts in.
    pub const fn status(&self) -> ShipmentStatus {
        ShipmentStatus::Created
    }

    /// Materialise the stored record, stamping both timestamps with `now`.
    ///
    /// Intended for stores that do not assign timestamps themselves.
    pub fn into_shipment(self, now: DateTime<Utc>) -> Shipment {
        Shipment {
            id: self.id,
            tracking_number: self.tracking_number,
            owner_id: self.owner_id,
            details: self.details,
            status: ShipmentStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Stored shipment fields used to rebuild a [`Shipment`].
#[derive(Debug, Clone)]
pub struct ShipmentDraft {
    pub id: ShipmentId,
    pub tracking_number: TrackingNumber,
    pub owner_id: UserId,
    pub details: ShipmentDetails,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted shipment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    id: ShipmentId,
    tracking_number: TrackingNumber,
    owner_id: UserId,
    details: ShipmentDetails,
    status: ShipmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Rebuild a shipment from stored fields.
    pub fn new(draft: ShipmentDraft) -> Self {
        let ShipmentDraft {
            id,
            tracking_number,
            owner_id,
            details,
            status,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            tracking_number,
            owner_id,
            details,
            status,
            created_at,
            updated_at,
        }
    }

    /// Surrogate identifier.
    pub const fn id(&self) -> ShipmentId {
        self.id
    }

    /// Public lookup key.
    pub const fn tracking_number(&self) -> &TrackingNumber {
        &self.tracking_number
    }

    /// User who created the shipment.
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Sender, receiver and contents.
    pub const fn details(&self) -> &ShipmentDetails {
        &self.details
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> ShipmentStatus {
        self.status
    }

    /// When the shipment was stored.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the status last changed.
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Copy of this record with a new status and modification time.
    #[must_use]
    pub fn with_status(mut self, status: ShipmentStatus, updated_at: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = updated_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> ShipmentDetailsDraft {
        ShipmentDetailsDraft {
            sender_name: "A".to_owned(),
            sender_address: "Addr A".to_owned(),
            receiver_name: "B".to_owned(),
            receiver_address: "Addr B".to_owned(),
            item_description: "Box".to_owned(),
        }
    }

    #[rstest]
    fn tracking_number_has_nanosecond_precision() {
        let instant = Utc
            .with_ymd_and_hms(2024, 12, 31, 23, 59, 58)
            .single()
            .expect("valid instant")
            + chrono::Duration::nanoseconds(123_456_789);

        let number = TrackingNumber::from_instant(instant);

        assert_eq!(number.as_str(), "20241231T235958.123456789");
        assert_eq!(number.as_str().len(), TRACKING_NUMBER_LEN);
    }

    #[rstest]
    fn tracking_number_for_now_is_twenty_five_characters() {
        assert_eq!(
            TrackingNumber::from_instant(Utc::now()).as_str().len(),
            TRACKING_NUMBER_LEN
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn tracking_number_rejects_blank(#[case] raw: &str) {
        assert_eq!(
            TrackingNumber::new(raw),
            Err(ShipmentValidationError::EmptyTrackingNumber)
        );
    }

    #[rstest]
    #[case("Created", ShipmentStatus::Created)]
    #[case("Shipped", ShipmentStatus::Shipped)]
    #[case("InTransit", ShipmentStatus::InTransit)]
    #[case("Delivered", ShipmentStatus::Delivered)]
    #[case("Cancelled", ShipmentStatus::Cancelled)]
    fn status_parses_wire_names(#[case] raw: &str, #[case] expected: ShipmentStatus) {
        assert_eq!(raw.parse::<ShipmentStatus>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("shipped")]
    #[case("In Transit")]
    #[case("Lost")]
    #[case("")]
    fn status_rejects_unknown_names(#[case] raw: &str) {
        let error = raw.parse::<ShipmentStatus>().expect_err("unknown status");
        assert_eq!(error.value(), raw);
    }

    #[rstest]
    fn only_created_is_unassignable() {
        assert!(!ShipmentStatus::Created.is_assignable());
        assert!(ShipmentStatus::ASSIGNABLE.iter().all(|s| s.is_assignable()));
    }

    #[rstest]
    fn details_trim_surrounding_whitespace(mut draft: ShipmentDetailsDraft) {
        draft.receiver_address = "  Addr B\n".to_owned();
        let details = ShipmentDetails::try_from_parts(draft).expect("valid details");
        assert_eq!(details.receiver_address(), "Addr B");
    }

    #[rstest]
    #[case(ShipmentField::SenderName)]
    #[case(ShipmentField::SenderAddress)]
    #[case(ShipmentField::ReceiverName)]
    #[case(ShipmentField::ReceiverAddress)]
    #[case(ShipmentField::ItemDescription)]
    fn details_reject_blank_fields(mut draft: ShipmentDetailsDraft, #[case] field: ShipmentField) {
        let slot = match field {
            ShipmentField::SenderName => &mut draft.sender_name,
            ShipmentField::SenderAddress => &mut draft.sender_address,
            ShipmentField::ReceiverName => &mut draft.receiver_name,
            ShipmentField::ReceiverAddress => &mut draft.receiver_address,
            ShipmentField::ItemDescription => &mut draft.item_description,
        };
        " \t".clone_into(slot);

        assert_eq!(
            ShipmentDetails::try_from_parts(draft),
            Err(ShipmentValidationError::EmptyField { field })
        );
    }

    #[rstest]
    fn new_shipment_starts_created(draft: ShipmentDetailsDraft) {
        let now = Utc::now();
        let details = ShipmentDetails::try_from_parts(draft).expect("valid details");
        let owner = UserId::random();
        let shipment = NewShipment::new(
            ShipmentId::random(),
            TrackingNumber::from_instant(now),
            owner,
            details,
        )
        .into_shipment(now);

        assert_eq!(shipment.status(), ShipmentStatus::Created);
        assert_eq!(shipment.owner_id(), &owner);
        assert_eq!(shipment.created_at(), shipment.updated_at());
    }

    #[rstest]
    fn with_status_keeps_identity_and_creation_time(draft: ShipmentDetailsDraft) {
        let created = Utc::now();
        let later = created + chrono::Duration::seconds(5);
        let details = ShipmentDetails::try_from_parts(draft).expect("valid details");
        let original = NewShipment::new(
            ShipmentId::random(),
            TrackingNumber::from_instant(created),
            UserId::random(),
            details,
        )
        .into_shipment(created);

        let updated = original.clone().with_status(ShipmentStatus::Delivered, later);

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.tracking_number(), original.tracking_number());
        assert_eq!(updated.created_at(), created);
        assert_eq!(updated.updated_at(), later);
        assert_eq!(updated.status(), ShipmentStatus::Delivered);
    }
}
