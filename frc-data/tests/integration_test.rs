//! Integration tests for bracket loading using the actual database backend.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;

use frc_core::calculations::{assess, calculate_withholding, group_for_statement, validate_table};
use frc_core::{
    FundRepository, HistoryType, NewNotary, NewPayment, NotaryStatus, PaymentStatus,
};
use frc_data::{BracketLoader, BracketLoaderError};
use frc_db_sqlite::SqliteRepository;

const TEST_CSV_2025: &str = include_str!("../test-data/irrf_brackets_2025.csv");

async fn setup_test_db() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    let repo = SqliteRepository::new_with_pool(pool);
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");

    repo
}

fn new_notary(
    code: &str,
    responsible_name: &str,
    responsible_cpf: &str,
) -> NewNotary {
    NewNotary {
        name: format!("Cartório {code}"),
        code: code.to_string(),
        cns_code: format!("CNS-{code}"),
        responsible_name: responsible_name.to_string(),
        responsible_cpf: responsible_cpf.to_string(),
        comarca: "Belém".to_string(),
        status: NotaryStatus::Ativo,
        address: "Rua Principal, 10".to_string(),
        city: None,
        state: Some("PA".to_string()),
        cep: None,
        phone: None,
        email: None,
        latitude: None,
        longitude: None,
        default_role: None,
        linkage_date: None,
    }
}

#[tokio::test]
async fn load_all_2025_brackets() {
    let repo = setup_test_db().await;

    let records = BracketLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");
    let inserted = BracketLoader::load(&repo, &records)
        .await
        .expect("Failed to load brackets");

    assert_eq!(inserted, 5);

    let brackets = repo.get_brackets(2025).await.expect("Failed to fetch");
    assert_eq!(brackets.len(), 5);
    assert_eq!(brackets[0].rate, dec!(0));
    assert_eq!(brackets[4].rate, dec!(0.275));
    assert!(brackets[4].max_value.is_none()); // Top bracket has no max
}

#[tokio::test]
async fn loading_twice_replaces_instead_of_duplicating() {
    let repo = setup_test_db().await;
    let records = BracketLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");

    BracketLoader::load(&repo, &records)
        .await
        .expect("First load");
    BracketLoader::load(&repo, &records)
        .await
        .expect("Second load");

    let brackets = repo.get_brackets(2025).await.expect("Failed to fetch");
    assert_eq!(brackets.len(), 5);
}

#[tokio::test]
async fn loaded_table_passes_integrity_check() {
    let repo = setup_test_db().await;
    let records = BracketLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");
    BracketLoader::load(&repo, &records)
        .await
        .expect("Failed to load brackets");

    let brackets = repo.get_brackets(2025).await.expect("Failed to fetch");

    assert_eq!(validate_table(&brackets), Vec::new());
}

#[tokio::test]
async fn malformed_csv_surfaces_parse_error() {
    let csv = "year,min_value,max_value,rate,deduction\n2025,oops,,0.1,0\n";

    let result = BracketLoader::parse(csv.as_bytes());

    assert!(matches!(result, Err(BracketLoaderError::CsvParse(_))));
}

#[tokio::test]
async fn loaded_brackets_drive_withholding() {
    let repo = setup_test_db().await;
    let records = BracketLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");
    BracketLoader::load(&repo, &records)
        .await
        .expect("Failed to load brackets");

    let brackets = repo.get_brackets(2025).await.expect("Failed to fetch");

    let exempt = calculate_withholding(dec!(2259.20), &brackets);
    assert_eq!(exempt.tax, dec!(0.00));
    assert!(exempt.matched);

    let top = calculate_withholding(dec!(100000), &brackets);
    assert_eq!(top.tax, dec!(26604.00));

    let missing_year = repo.get_brackets(2030).await.expect("Failed to fetch");
    let fallback = calculate_withholding(dec!(5000.00), &missing_year);
    assert_eq!(fallback.tax, dec!(0.00));
    assert!(!fallback.matched);
}

/// End-to-end: load the table, register payments for two offices sharing a
/// responsible party, and produce one consolidated statement.
#[tokio::test]
async fn registered_payments_consolidate_into_one_statement() {
    let repo = setup_test_db().await;
    let records = BracketLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");
    BracketLoader::load(&repo, &records)
        .await
        .expect("Failed to load brackets");
    let brackets = repo.get_brackets(2025).await.expect("Failed to fetch");

    let first = repo
        .create_notary(new_notary("750", "Tayla Guilhon", "111.111.111-11"))
        .await
        .expect("Failed to create notary");
    let second = repo
        .create_notary(new_notary("1378", "Tayla Guilhon", "111.111.111-11"))
        .await
        .expect("Failed to create notary");

    for (notary, gross, month, day) in [
        (&first, dec!(10070.00), "10", 16),
        (&second, dec!(1950.00), "2", 12),
    ] {
        let assessment = assess(gross, &brackets);
        repo.create_payment(NewPayment {
            notary_id: notary.id,
            notary_name: notary.name.clone(),
            code: notary.code.clone(),
            responsible_name: notary.responsible_name.clone(),
            cpf: notary.responsible_cpf.clone(),
            comarca: notary.comarca.clone(),
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            month_reference: month.to_string(),
            year_reference: 2025,
            gross_value: assessment.gross,
            irrf_value: assessment.tax,
            net_value: assessment.net,
            history_type: HistoryType::Repasse,
            status: PaymentStatus::Pago,
            pending_reason: None,
        })
        .await
        .expect("Failed to create payment");
    }

    let notaries = repo.list_notaries().await.expect("Failed to list notaries");
    let payments = repo
        .list_payments(Some(2025))
        .await
        .expect("Failed to list payments");

    for payment in &payments {
        assert_eq!(payment.net_value, payment.gross_value - payment.irrf_value);
    }

    let groups = group_for_statement(&notaries, &payments);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].responsible_cpf, "111.111.111-11");
    assert_eq!(groups[0].notaries.len(), 2);
    assert_eq!(groups[0].payments.len(), 2);
    assert_eq!(groups[0].total_gross(), dec!(12020.00));
    // 10070 × 0.275 − 896 = 1873.25; 1950 is exempt
    assert_eq!(groups[0].total_irrf(), dec!(1873.25));
    assert_eq!(groups[0].total_net(), dec!(10146.75));
    // Month "2" sorts before month "10" numerically.
    assert_eq!(groups[0].payments[0].month_reference, "2");
}
