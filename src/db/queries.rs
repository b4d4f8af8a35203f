use crate::db::Database;
use crate::error::{Result, SoilCastError};
use crate::models::{CropType, FieldProfile, MoistureReading};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

// Field Queries

impl Database {
    pub fn create_field(&self, field: &FieldProfile) -> Result<i64> {
        if self.get_field_by_name(&field.name)?.is_some() {
            return Err(SoilCastError::InvalidData(format!(
                "A field named '{}' already exists",
                field.name
            )));
        }

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO fields
                    (name, crop_type, area_hectares, planting_date, moisture_threshold, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    field.name,
                    format!("{:?}", field.crop_type),
                    field.area_hectares,
                    field.planting_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    field.moisture_threshold,
                    field.created_at.to_rfc3339(),
                    field.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_field_by_name(&self, name: &str) -> Result<Option<FieldProfile>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM fields WHERE name = ?1",
                [name],
                row_to_field,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Like `get_field_by_name` but a missing field is an error
    pub fn require_field(&self, name: &str) -> Result<FieldProfile> {
        self.get_field_by_name(name)?
            .ok_or_else(|| SoilCastError::NotFound(format!("field '{}'", name)))
    }

    pub fn list_fields(&self) -> Result<Vec<FieldProfile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM fields ORDER BY name")?;
            let fields = stmt
                .query_map([], row_to_field)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(fields)
        })
    }
}

fn row_to_field(row: &Row) -> rusqlite::Result<FieldProfile> {
    let crop_type_str: String = row.get("crop_type")?;
    let planting_date_str: Option<String> = row.get("planting_date")?;
    let created_at_str: String = row.get("created_at")?;
    let updated_at_str: String = row.get("updated_at")?;

    let crop_type = CropType::from_str(&crop_type_str);
    if crop_type == CropType::Other && !crop_type_str.eq_ignore_ascii_case("other") {
        warn!(
            crop_type = %crop_type_str,
            "Unknown crop_type in database, using generic coefficients"
        );
    }

    let planting_date = planting_date_str.as_ref().and_then(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| warn!(planting_date = %s, "Unparseable planting_date in database, ignoring"))
            .ok()
    });

    Ok(FieldProfile {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        crop_type,
        area_hectares: row.get("area_hectares")?,
        planting_date,
        moisture_threshold: row.get("moisture_threshold")?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

// Moisture Reading Queries

impl Database {
    /// Store a reading. Returns `false` when the field already has a reading
    /// for that date; the first write for a (field, date) pair is kept.
    /// Any other constraint failure is an error.
    pub fn insert_reading(&self, field_id: i64, reading: &MoistureReading) -> Result<bool> {
        // SQLite stores NaN as NULL
        let finite_vh = reading.vh_backscatter_db.map_or(true, f64::is_finite);
        if !reading.vv_backscatter_db.is_finite() || !finite_vh {
            return Err(SoilCastError::InvalidData(format!(
                "backscatter for {} must be finite (VV {}, VH {:?})",
                reading.observation_date, reading.vv_backscatter_db, reading.vh_backscatter_db
            )));
        }

        self.with_conn(|conn| {
            let inserted = conn.execute(
                r#"
                INSERT INTO moisture_readings
                    (field_id, observation_date, moisture_index, vv_backscatter_db,
                     vh_backscatter_db, source)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(field_id, observation_date) DO NOTHING
                "#,
                params![
                    field_id,
                    reading.observation_date.format("%Y-%m-%d").to_string(),
                    reading.moisture_index,
                    reading.vv_backscatter_db,
                    reading.vh_backscatter_db,
                    reading.source,
                ],
            )?;
            Ok(inserted > 0)
        })
    }

    /// Readings for a field, newest first
    pub fn readings_for_field(&self, field_id: i64) -> Result<Vec<MoistureReading>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM moisture_readings WHERE field_id = ?1 ORDER BY observation_date DESC",
            )?;
            let readings = stmt
                .query_map([field_id], row_to_reading)?
                .filter_map(|r| match r {
                    Ok(reading) => Some(reading),
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable moisture reading");
                        None
                    }
                })
                .collect();
            Ok(readings)
        })
    }

    pub fn latest_reading(&self, field_id: i64) -> Result<Option<MoistureReading>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM moisture_readings WHERE field_id = ?1 ORDER BY observation_date DESC LIMIT 1",
                [field_id],
                row_to_reading,
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<MoistureReading> {
    let date_str: String = row.get("observation_date")?;
    let observation_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(MoistureReading {
        observation_date,
        moisture_index: row.get("moisture_index")?,
        vv_backscatter_db: row.get("vv_backscatter_db")?,
        vh_backscatter_db: row.get("vh_backscatter_db")?,
        source: row.get("source")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample_field(db: &Database) -> i64 {
        let field = FieldProfile::new("North Plot".into(), CropType::Wheat, 12.5)
            .with_planting_date(date(1))
            .with_threshold(0.35);
        db.create_field(&field).unwrap()
    }

    #[test]
    fn field_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = sample_field(&db);

        let field = db.get_field_by_name("North Plot").unwrap().unwrap();
        assert_eq!(field.id, Some(id));
        assert_eq!(field.crop_type, CropType::Wheat);
        assert_eq!(field.area_hectares, 12.5);
        assert_eq!(field.planting_date, Some(date(1)));
        assert_eq!(field.moisture_threshold, Some(0.35));
    }

    #[test]
    fn duplicate_field_name_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        sample_field(&db);
        let dup = FieldProfile::new("North Plot".into(), CropType::Corn, 1.0);
        assert!(matches!(
            db.create_field(&dup),
            Err(SoilCastError::InvalidData(_))
        ));
    }

    #[test]
    fn missing_field() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_field_by_name("nowhere").unwrap().is_none());
        assert!(matches!(
            db.require_field("nowhere"),
            Err(SoilCastError::NotFound(_))
        ));
    }

    #[test]
    fn list_fields_sorted_by_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_field(&FieldProfile::new("b".into(), CropType::Rye, 1.0))
            .unwrap();
        db.create_field(&FieldProfile::new("a".into(), CropType::Potato, 2.0))
            .unwrap();

        let names: Vec<String> = db.list_fields().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn first_reading_per_date_wins() {
        let db = Database::open_in_memory().unwrap();
        let id = sample_field(&db);

        let first = MoistureReading::from_backscatter(date(5), -14.0, None, "first");
        let second = MoistureReading::from_backscatter(date(5), -9.0, None, "second");

        assert!(db.insert_reading(id, &first).unwrap());
        assert!(!db.insert_reading(id, &second).unwrap());

        let readings = db.readings_for_field(id).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].source, "first");
        assert_eq!(readings[0].moisture_index, 0.5);
    }

    #[test]
    fn readings_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let id = sample_field(&db);

        for (day, vv) in [(3, -15.0), (9, -12.0), (6, -18.0)] {
            let reading = MoistureReading::from_backscatter(date(day), vv, Some(-21.0), "s1");
            db.insert_reading(id, &reading).unwrap();
        }

        let readings = db.readings_for_field(id).unwrap();
        let dates: Vec<NaiveDate> = readings.iter().map(|r| r.observation_date).collect();
        assert_eq!(dates, vec![date(9), date(6), date(3)]);
        assert_eq!(readings[0].vh_backscatter_db, Some(-21.0));

        let latest = db.latest_reading(id).unwrap().unwrap();
        assert_eq!(latest.observation_date, date(9));
    }

    #[test]
    fn readings_are_scoped_to_field() {
        let db = Database::open_in_memory().unwrap();
        let north = sample_field(&db);
        let south = db
            .create_field(&FieldProfile::new("South".into(), CropType::Corn, 4.0))
            .unwrap();

        let reading = MoistureReading::from_backscatter(date(2), -14.0, None, "s1");
        db.insert_reading(north, &reading).unwrap();
        assert!(db.insert_reading(south, &reading).unwrap());

        assert_eq!(db.readings_for_field(north).unwrap().len(), 1);
        assert_eq!(db.readings_for_field(south).unwrap().len(), 1);
        assert!(db.latest_reading(999).unwrap().is_none());
    }

    #[test]
    fn non_finite_backscatter_is_rejected_not_skipped() {
        let db = Database::open_in_memory().unwrap();
        let id = sample_field(&db);

        let nan_vv = MoistureReading::from_backscatter(date(7), f64::NAN, None, "s1");
        assert_eq!(nan_vv.moisture_index, 0.0);
        assert!(matches!(
            db.insert_reading(id, &nan_vv),
            Err(SoilCastError::InvalidData(_))
        ));

        let inf_vh = MoistureReading::from_backscatter(date(7), -14.0, Some(f64::INFINITY), "s1");
        assert!(matches!(
            db.insert_reading(id, &inf_vh),
            Err(SoilCastError::InvalidData(_))
        ));

        assert!(db.readings_for_field(id).unwrap().is_empty());
    }

    #[test]
    fn constraint_violations_other_than_duplicates_surface() {
        let db = Database::open_in_memory().unwrap();
        let id = sample_field(&db);

        let mut out_of_range = MoistureReading::from_backscatter(date(8), -14.0, None, "s1");
        out_of_range.moisture_index = 1.5;
        assert!(matches!(
            db.insert_reading(id, &out_of_range),
            Err(SoilCastError::Database(_))
        ));

        let orphan = MoistureReading::from_backscatter(date(8), -14.0, None, "s1");
        assert!(matches!(
            db.insert_reading(id + 100, &orphan),
            Err(SoilCastError::Database(_))
        ));

        assert!(db.readings_for_field(id).unwrap().is_empty());
    }
}
