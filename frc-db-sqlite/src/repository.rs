use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use frc_core::{
    FundRepository, HistoryType, IrrfBracket, NewIrrfBracket, NewNotary, NewPayment, Notary,
    NotaryStatus, Payment, PaymentStatus, RepositoryError, ResponsibleRole,
};
use rust_decimal::Decimal;
use sqlx::{
    FromRow,
    sqlite::{SqliteConnectOptions, SqlitePool},
};
use tracing::debug;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open `database_url` — a file path or `":memory:"`. A missing database
    /// file is created rather than reported as an error.
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepositoryError::Connection(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<(), RepositoryError> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to read seeds directory '{}': {}",
                    seeds_dir.display(),
                    e
                ))
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to read seed file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

            debug!(seed = %path.display(), "executing seed file");
            sqlx::raw_sql(&sql).execute(&self.pool).await.map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to execute seed file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Run the bundled seed files, locating them the same way at every call
    /// site: the `FRC_DB_SQLITE_SEEDS_DIR` environment variable wins, then a
    /// `seeds` directory under the current working directory, then the one
    /// shipped next to this crate's manifest.
    pub async fn run_default_seeds(&self) -> Result<(), RepositoryError> {
        self.run_seeds(&Self::default_seeds_dir()).await
    }

    fn default_seeds_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os("FRC_DB_SQLITE_SEEDS_DIR") {
            return PathBuf::from(dir);
        }
        let local = Path::new("seeds");
        if local.is_dir() {
            return local.to_path_buf();
        }
        Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds")
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(FromRow)]
struct IrrfBracketRow {
    id: i64,
    year: i32,
    min_value: String,
    max_value: Option<String>,
    rate: String,
    deduction: String,
}

impl TryFrom<IrrfBracketRow> for IrrfBracket {
    type Error = RepositoryError;

    fn try_from(row: IrrfBracketRow) -> Result<Self, Self::Error> {
        Ok(IrrfBracket {
            id: row.id,
            year: row.year,
            min_value: parse_decimal(&row.min_value)?,
            max_value: parse_optional_decimal(&row.max_value)?,
            rate: parse_decimal(&row.rate)?,
            deduction: parse_decimal(&row.deduction)?,
        })
    }
}

#[derive(FromRow)]
struct NotaryRow {
    id: i64,
    name: String,
    code: String,
    cns_code: String,
    responsible_name: String,
    responsible_cpf: String,
    comarca: String,
    status: String,
    address: String,
    city: Option<String>,
    state: Option<String>,
    cep: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    default_role: Option<String>,
    linkage_date: Option<String>,
}

impl TryFrom<NotaryRow> for Notary {
    type Error = RepositoryError;

    fn try_from(row: NotaryRow) -> Result<Self, Self::Error> {
        let status = NotaryStatus::parse(&row.status)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid status: {}", row.status)))?;
        let default_role = row
            .default_role
            .as_deref()
            .map(|s| {
                ResponsibleRole::parse(s)
                    .ok_or_else(|| RepositoryError::Database(format!("Invalid role: {s}")))
            })
            .transpose()?;

        Ok(Notary {
            id: row.id,
            name: row.name,
            code: row.code,
            cns_code: row.cns_code,
            responsible_name: row.responsible_name,
            responsible_cpf: row.responsible_cpf,
            comarca: row.comarca,
            status,
            address: row.address,
            city: row.city,
            state: row.state,
            cep: row.cep,
            phone: row.phone,
            email: row.email,
            latitude: row.latitude,
            longitude: row.longitude,
            default_role,
            linkage_date: row.linkage_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    notary_id: i64,
    notary_name: String,
    code: String,
    responsible_name: String,
    cpf: String,
    comarca: String,
    date: String,
    month_reference: String,
    year_reference: i32,
    gross_value: String,
    irrf_value: String,
    net_value: String,
    history_type: String,
    status: String,
    pending_reason: Option<String>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let history_type = HistoryType::parse(&row.history_type).ok_or_else(|| {
            RepositoryError::Database(format!("Invalid history type: {}", row.history_type))
        })?;
        let status = PaymentStatus::parse(&row.status)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid status: {}", row.status)))?;

        Ok(Payment {
            id: row.id,
            notary_id: row.notary_id,
            notary_name: row.notary_name,
            code: row.code,
            responsible_name: row.responsible_name,
            cpf: row.cpf,
            comarca: row.comarca,
            date: parse_date(&row.date)?,
            month_reference: row.month_reference,
            year_reference: row.year_reference,
            gross_value: parse_decimal(&row.gross_value)?,
            irrf_value: parse_decimal(&row.irrf_value)?,
            net_value: parse_decimal(&row.net_value)?,
            history_type,
            status,
            pending_reason: row.pending_reason,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_optional_decimal(s: &Option<String>) -> Result<Option<Decimal>, RepositoryError> {
    s.as_ref().map(|s| parse_decimal(s)).transpose()
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
}

const PAYMENT_COLUMNS: &str = "id, notary_id, notary_name, code, responsible_name, cpf, comarca,
            date, month_reference, year_reference, gross_value, irrf_value,
            net_value, history_type, status, pending_reason";

const NOTARY_COLUMNS: &str = "id, name, code, cns_code, responsible_name, responsible_cpf,
            comarca, status, address, city, state, cep, phone, email,
            latitude, longitude, default_role, linkage_date";

#[async_trait]
impl FundRepository for SqliteRepository {
    async fn get_brackets(&self, year: i32) -> Result<Vec<IrrfBracket>, RepositoryError> {
        // min_value is stored as TEXT, so the sort must go through a numeric
        // cast; a text sort would misplace five-digit bounds.
        let rows: Vec<IrrfBracketRow> = sqlx::query_as(
            "SELECT id, year, min_value, max_value, rate, deduction
             FROM irrf_brackets
             WHERE year = ?
             ORDER BY CAST(min_value AS REAL)",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if rows.is_empty() {
            debug!(year, "no IRRF bracket table loaded for year");
        }

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn list_bracket_years(&self) -> Result<Vec<i32>, RepositoryError> {
        let rows: Vec<(i32,)> =
            sqlx::query_as("SELECT DISTINCT year FROM irrf_brackets ORDER BY year")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(year,)| year).collect())
    }

    async fn create_bracket(
        &self,
        bracket: NewIrrfBracket,
    ) -> Result<IrrfBracket, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO irrf_brackets (year, min_value, max_value, rate, deduction)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(bracket.year)
        .bind(bracket.min_value.to_string())
        .bind(bracket.max_value.map(|d| d.to_string()))
        .bind(bracket.rate.to_string())
        .bind(bracket.deduction.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let row: IrrfBracketRow = sqlx::query_as(
            "SELECT id, year, min_value, max_value, rate, deduction
             FROM irrf_brackets WHERE id = ?",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.try_into()
    }

    async fn update_bracket(&self, bracket: &IrrfBracket) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE irrf_brackets
             SET year = ?, min_value = ?, max_value = ?, rate = ?, deduction = ?
             WHERE id = ?",
        )
        .bind(bracket.year)
        .bind(bracket.min_value.to_string())
        .bind(bracket.max_value.map(|d| d.to_string()))
        .bind(bracket.rate.to_string())
        .bind(bracket.deduction.to_string())
        .bind(bracket.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_bracket(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM irrf_brackets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_brackets_for_year(&self, year: i32) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM irrf_brackets WHERE year = ?")
            .bind(year)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn get_notary(&self, id: i64) -> Result<Notary, RepositoryError> {
        let row: NotaryRow =
            sqlx::query_as(&format!("SELECT {NOTARY_COLUMNS} FROM notaries WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?
                .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list_notaries(&self) -> Result<Vec<Notary>, RepositoryError> {
        let rows: Vec<NotaryRow> =
            sqlx::query_as(&format!("SELECT {NOTARY_COLUMNS} FROM notaries ORDER BY name"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn create_notary(&self, notary: NewNotary) -> Result<Notary, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO notaries (
                name, code, cns_code, responsible_name, responsible_cpf,
                comarca, status, address, city, state, cep, phone, email,
                latitude, longitude, default_role, linkage_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notary.name)
        .bind(&notary.code)
        .bind(&notary.cns_code)
        .bind(&notary.responsible_name)
        .bind(&notary.responsible_cpf)
        .bind(&notary.comarca)
        .bind(notary.status.as_str())
        .bind(&notary.address)
        .bind(&notary.city)
        .bind(&notary.state)
        .bind(&notary.cep)
        .bind(&notary.phone)
        .bind(&notary.email)
        .bind(notary.latitude)
        .bind(notary.longitude)
        .bind(notary.default_role.map(|r| r.as_str()))
        .bind(notary.linkage_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        self.get_notary(result.last_insert_rowid()).await
    }

    async fn update_notary(&self, notary: &Notary) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE notaries SET
                name = ?, code = ?, cns_code = ?, responsible_name = ?,
                responsible_cpf = ?, comarca = ?, status = ?, address = ?,
                city = ?, state = ?, cep = ?, phone = ?, email = ?,
                latitude = ?, longitude = ?, default_role = ?, linkage_date = ?
             WHERE id = ?",
        )
        .bind(&notary.name)
        .bind(&notary.code)
        .bind(&notary.cns_code)
        .bind(&notary.responsible_name)
        .bind(&notary.responsible_cpf)
        .bind(&notary.comarca)
        .bind(notary.status.as_str())
        .bind(&notary.address)
        .bind(&notary.city)
        .bind(&notary.state)
        .bind(&notary.cep)
        .bind(&notary.phone)
        .bind(&notary.email)
        .bind(notary.latitude)
        .bind(notary.longitude)
        .bind(notary.default_role.map(|r| r.as_str()))
        .bind(notary.linkage_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(notary.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO payments (
                notary_id, notary_name, code, responsible_name, cpf, comarca,
                date, month_reference, year_reference, gross_value, irrf_value,
                net_value, history_type, status, pending_reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(payment.notary_id)
        .bind(&payment.notary_name)
        .bind(&payment.code)
        .bind(&payment.responsible_name)
        .bind(&payment.cpf)
        .bind(&payment.comarca)
        .bind(payment.date.format("%Y-%m-%d").to_string())
        .bind(&payment.month_reference)
        .bind(payment.year_reference)
        .bind(payment.gross_value.to_string())
        .bind(payment.irrf_value.to_string())
        .bind(payment.net_value.to_string())
        .bind(payment.history_type.as_str())
        .bind(payment.status.as_str())
        .bind(&payment.pending_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        self.get_payment(result.last_insert_rowid()).await
    }

    async fn get_payment(&self, id: i64) -> Result<Payment, RepositoryError> {
        let row: PaymentRow =
            sqlx::query_as(&format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?
                .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list_payments(&self, year: Option<i32>) -> Result<Vec<Payment>, RepositoryError> {
        let rows: Vec<PaymentRow> = match year {
            Some(year) => {
                sqlx::query_as(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments
                     WHERE year_reference = ? ORDER BY date, id"
                ))
                .bind(year)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY date, id"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn list_payments_for_notary(
        &self,
        notary_id: i64,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments
             WHERE notary_id = ? ORDER BY date, id"
        ))
        .bind(notary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn update_payment_status(
        &self,
        id: i64,
        status: PaymentStatus,
        pending_reason: Option<String>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE payments SET status = ?, pending_reason = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&pending_reason)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
