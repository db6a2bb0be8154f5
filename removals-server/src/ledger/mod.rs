//! Durable order ledger.
//!
//! An append-only CSV record store plus a cached last-assigned order
//! id. The ledger is the one piece of process-wide mutable state: the
//! counter is recovered from the store exactly once at startup and
//! mutated only through [`OrderLedger::append`].
//!
//! Exactly one writer process is assumed; id uniqueness is not
//! coordinated across instances. The ledger exclusively owns the file
//! handle.

mod error;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;

use crate::domain::{BookingDetails, BookingOrder, OrderId};

pub use error::LedgerError;

/// Column names for the ledger file, in record order.
const HEADER: [&str; 22] = [
    "orderId",
    "timestamp",
    "moveDate",
    "pickupPostcode",
    "pickupType",
    "pickupFloor",
    "pickupElevator",
    "pickupParking",
    "dropoffPostcode",
    "dropoffType",
    "dropoffFloor",
    "dropoffElevator",
    "dropoffParking",
    "bedrooms",
    "houseSize",
    "itemPiano",
    "itemPool",
    "itemArt",
    "multipleLocations",
    "notes",
    "finalPrice",
    "paid",
];

struct LedgerInner {
    writer: csv::Writer<Box<dyn Write + Send>>,
    last_id: u64,
}

/// Durable, crash-recoverable order ledger.
///
/// Owns the record store and the cached counter; exposes only the
/// atomic assign-and-append operation.
pub struct OrderLedger {
    inner: Mutex<LedgerInner>,
}

impl std::fmt::Debug for OrderLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLedger").finish_non_exhaustive()
    }
}

impl OrderLedger {
    /// Open the ledger, creating the store if it does not exist.
    ///
    /// A missing or empty file gets the header row and starts the
    /// counter at 0. Otherwise all records are scanned and the last
    /// record's leading field becomes the recovered counter; anything
    /// unreadable there is a [`LedgerError::Recovery`], which callers
    /// must treat as fatal to startup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();

        let is_new = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let last_id = if is_new { 0 } else { recover_last_id(path)? };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Box::new(file) as Box<dyn Write + Send>);

        if is_new {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            inner: Mutex::new(LedgerInner { writer, last_id }),
        })
    }

    /// Assign the next order id and durably append the booking.
    ///
    /// The increment and the write happen under one lock with no await
    /// point between them, so two confirmations can never receive the
    /// same id. If the write fails the id stays consumed; the error
    /// carries it so the caller can retry or escalate.
    pub async fn append(&self, details: BookingDetails) -> Result<BookingOrder, LedgerError> {
        let mut inner = self.inner.lock().await;

        inner.last_id += 1;
        let order = BookingOrder {
            id: OrderId(inner.last_id),
            timestamp: Utc::now(),
            details,
        };

        let record = booking_record(&order);
        let written = inner
            .writer
            .write_record(&record)
            .map_err(|e| e.to_string())
            .and_then(|_| inner.writer.flush().map_err(|e| e.to_string()));

        match written {
            Ok(()) => Ok(order),
            Err(message) => Err(LedgerError::Persistence {
                order_id: order.id.0,
                message,
            }),
        }
    }

    /// The most recently assigned order id (0 if none yet).
    pub async fn last_id(&self) -> u64 {
        self.inner.lock().await.last_id
    }

    /// Build a ledger over an arbitrary writer, skipping recovery.
    #[cfg(test)]
    fn with_writer(writer: Box<dyn Write + Send>, last_id: u64) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        Self {
            inner: Mutex::new(LedgerInner { writer, last_id }),
        }
    }
}

/// Scan the store and recover the last assigned id.
///
/// O(records); the csv reader handles quoted fields, so notes with
/// embedded delimiters or newlines cannot confuse record boundaries.
fn recover_last_id(path: &Path) -> Result<u64, LedgerError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LedgerError::Recovery {
            message: format!("cannot read ledger: {e}"),
        })?;

    let headers = reader.headers().map_err(|e| LedgerError::Recovery {
        message: format!("cannot read ledger header: {e}"),
    })?;
    if headers.get(0) != Some(HEADER[0]) {
        return Err(LedgerError::Recovery {
            message: format!("unexpected ledger schema: first column {:?}", headers.get(0)),
        });
    }

    let mut last: Option<csv::StringRecord> = None;
    for record in reader.records() {
        let record = record.map_err(|e| LedgerError::Recovery {
            message: format!("unreadable record: {e}"),
        })?;
        last = Some(record);
    }

    match last {
        None => Ok(0),
        Some(record) => {
            let field = record.get(0).unwrap_or_default();
            field.parse::<u64>().map_err(|_| LedgerError::Recovery {
                message: format!("non-numeric trailing order id: {field:?}"),
            })
        }
    }
}

/// Serialize a booking as one ledger record, fields in `HEADER` order.
fn booking_record(order: &BookingOrder) -> Vec<String> {
    let d = &order.details;
    vec![
        order.id.to_string(),
        order
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        d.move_date.to_string(),
        d.pickup.postcode.as_str().to_string(),
        d.pickup.property_type.clone(),
        d.pickup.floor.to_string(),
        d.pickup.elevator.to_string(),
        d.pickup.parking.to_string(),
        d.dropoff.postcode.as_str().to_string(),
        d.dropoff.property_type.clone(),
        d.dropoff.floor.to_string(),
        d.dropoff.elevator.to_string(),
        d.dropoff.parking.to_string(),
        d.bedrooms.to_string(),
        d.house_size.clone(),
        d.item_piano.to_string(),
        d.item_pool.to_string(),
        d.item_art.to_string(),
        d.multiple_locations.to_string(),
        d.notes.clone(),
        format!("{:.2}", d.final_price),
        d.paid.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationDetails, Postcode};
    use chrono::NaiveDate;

    fn location(postcode: &str) -> LocationDetails {
        LocationDetails {
            postcode: Postcode::parse(postcode).unwrap(),
            property_type: "flat".into(),
            floor: 2,
            elevator: true,
            parking: false,
        }
    }

    fn details() -> BookingDetails {
        BookingDetails {
            move_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            pickup: location("SW1A 1AA"),
            dropoff: location("M1 1AE"),
            bedrooms: 3,
            house_size: "80".into(),
            item_piano: true,
            item_pool: false,
            item_art: false,
            multiple_locations: false,
            notes: "call on arrival".into(),
            final_price: 376.2,
            paid: false,
        }
    }

    #[tokio::test]
    async fn open_writes_header_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        let ledger = OrderLedger::open(&path).unwrap();
        assert_eq!(ledger.last_id().await, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("orderId,timestamp,moveDate,"));
        assert_eq!(contents.lines().count(), 1);
    }

    #[tokio::test]
    async fn ids_are_gapless_from_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = OrderLedger::open(dir.path().join("orders.csv")).unwrap();

        for expected in 1..=5u64 {
            let order = ledger.append(details()).await.unwrap();
            assert_eq!(order.id, OrderId(expected));
        }
        assert_eq!(ledger.last_id().await, 5);
    }

    #[tokio::test]
    async fn recovery_resumes_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        {
            let ledger = OrderLedger::open(&path).unwrap();
            for _ in 0..3 {
                ledger.append(details()).await.unwrap();
            }
        }

        let ledger = OrderLedger::open(&path).unwrap();
        assert_eq!(ledger.last_id().await, 3);
        let order = ledger.append(details()).await.unwrap();
        assert_eq!(order.id, OrderId(4));
    }

    #[tokio::test]
    async fn recovery_reads_last_record_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        // Hand-write a store whose last record carries id 17.
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer.write_record(HEADER).unwrap();
        let mut record = vec!["17".to_string(), "2026-08-01T09:00:00.000Z".to_string()];
        record.extend(vec!["x".to_string(); HEADER.len() - 2]);
        writer.write_record(&record).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let ledger = OrderLedger::open(&path).unwrap();
        assert_eq!(ledger.last_id().await, 17);
        let order = ledger.append(details()).await.unwrap();
        assert_eq!(order.id, OrderId(18));
    }

    #[tokio::test]
    async fn corrupt_trailing_id_fails_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        let mut contents = HEADER.join(",");
        contents.push('\n');
        contents.push_str("not-a-number,2026-08-01T09:00:00.000Z\n");
        std::fs::write(&path, contents).unwrap();

        let err = OrderLedger::open(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Recovery { .. }));
    }

    #[tokio::test]
    async fn foreign_schema_fails_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "foo,bar\n1,2\n").unwrap();

        let err = OrderLedger::open(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Recovery { .. }));
    }

    #[tokio::test]
    async fn empty_existing_file_treated_as_new() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "").unwrap();

        let ledger = OrderLedger::open(&path).unwrap();
        let order = ledger.append(details()).await.unwrap();
        assert_eq!(order.id, OrderId(1));
    }

    #[tokio::test]
    async fn notes_with_delimiters_do_not_break_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        {
            let ledger = OrderLedger::open(&path).unwrap();
            let mut tricky = details();
            tricky.notes = "fragile, \"antique\" mirror\nsecond line".into();
            ledger.append(tricky).await.unwrap();
        }

        // Recovery still sees exactly one record despite the embedded
        // comma, quotes, and newline.
        let ledger = OrderLedger::open(&path).unwrap();
        assert_eq!(ledger.last_id().await, 1);
        let order = ledger.append(details()).await.unwrap();
        assert_eq!(order.id, OrderId(2));

        // And the notes field round-trips through the csv escaping.
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get(19),
            Some("fragile, \"antique\" mirror\nsecond line")
        );
    }

    /// A writer whose every operation fails, for exercising the
    /// persistence-failure path.
    struct BrokenWriter;

    impl std::io::Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[tokio::test]
    async fn failed_append_consumes_the_id() {
        let ledger = OrderLedger::with_writer(Box::new(BrokenWriter), 0);

        let err = ledger.append(details()).await.unwrap_err();
        match err {
            LedgerError::Persistence { order_id, .. } => assert_eq!(order_id, 1),
            other => panic!("expected Persistence, got {other:?}"),
        }

        // The id is consumed even though nothing was written; a retry
        // gets a fresh one rather than reusing it.
        assert_eq!(ledger.last_id().await, 1);

        let err = ledger.append(details()).await.unwrap_err();
        match err {
            LedgerError::Persistence { order_id, .. } => assert_eq!(order_id, 2),
            other => panic!("expected Persistence, got {other:?}"),
        }
        assert_eq!(ledger.last_id().await, 2);
    }

    #[tokio::test]
    async fn record_field_order_matches_header() {
        let order = BookingOrder {
            id: OrderId(7),
            timestamp: chrono::DateTime::parse_from_rfc3339("2026-08-26T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            details: details(),
        };

        let record = booking_record(&order);
        assert_eq!(record.len(), HEADER.len());
        assert_eq!(record[0], "7");
        assert_eq!(record[1], "2026-08-26T10:00:00.000Z");
        assert_eq!(record[2], "2026-09-01");
        assert_eq!(record[3], "SW1A 1AA");
        assert_eq!(record[8], "M1 1AE");
        assert_eq!(record[13], "3");
        assert_eq!(record[20], "376.20");
        assert_eq!(record[21], "false");
    }
}
