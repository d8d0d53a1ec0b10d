use chrono::NaiveDate;
use core_types::DateRange;
use dataset::{load_csv, DatasetError, LoadOptions};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,\
order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,\
order_item_id,product_id,seller_id,shipping_limit_date,price,freight_value,payment_sequential,\
payment_type,payment_installments,payment_value,review_id,review_score,review_comment_title,\
review_comment_message,review_creation_date,review_answer_timestamp,customer_unique_id,\
customer_zip_code_prefix,customer_city,customer_state,seller_zip_code_prefix,seller_city,\
seller_state,product_category_name,product_category_name_english";

fn write_fixture(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn loads_the_joined_export_and_sorts_by_purchase_time() {
    let file = write_fixture(&[
        "e481f51c,9ef432eb,delivered,2017-10-02 10:56:33,2017-10-02 11:07:15,2017-10-04 19:55:00,\
2017-10-10 21:25:13,2017-10-18 00:00:00,1.0,87285b34,3504c0cb,2017-10-06 11:07:15,29.99,8.72,1.0,\
credit_card,1.0,18.12,a54f0611,4.0,,\"Não testei o produto, mas...\",2017-10-11 00:00:00,\
2017-10-12 03:43:48,7c396fd4,3149,sao paulo,SP,9350,maua,SP,utilidades_domesticas,housewares",
        "53cdb2fc,b0830fb4,delivered,2017-08-15 18:29:31,2017-08-15 20:05:16,,,2017-09-04 00:00:00,\
2.0,595fac2a,289cdb32,2017-08-21 20:05:16,118.70,22.76,1.0,boleto,1.0,141.46,8d5266042,5.0,,,\
2017-08-30 00:00:00,2017-08-31 10:04:01,af07308b,47813,barreiras,BA,31570,belo horizonte,SP,\
perfumaria,perfumery",
        "136cce7f,ed0271e0,unavailable,2017-04-11 12:22:08,2017-04-13 13:25:17,,,2017-05-09 00:00:00,\
,,,,,,1.0,credit_card,1.0,53.17,c2b7bd5e,1.0,,,2017-05-10 00:00:00,2017-05-10 12:31:06,\
7d2ad0e2,24220,niteroi,RJ,,,,,",
    ]);

    let dataset = load_csv(file.path(), LoadOptions::default()).unwrap();
    assert_eq!(dataset.len(), 3);

    let ids: Vec<_> = dataset.records().iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, ["136cce7f", "53cdb2fc", "e481f51c"]);

    let first = &dataset.records()[0];
    assert_eq!(first.order_item_id, None);
    assert_eq!(first.product_id, None);
    assert_eq!(first.product_category_name_english, None);
    assert_eq!(first.order_delivered_customer_date, None);
    assert_eq!(first.review_score, Some(1));

    let last = &dataset.records()[2];
    assert_eq!(last.order_item_id, Some(1));
    assert_eq!(last.payment_value, Some(dec!(18.12)));
    assert_eq!(last.customer_city.as_deref(), Some("sao paulo"));
    assert_eq!(last.product_category_name_english.as_deref(), Some("housewares"));

    assert_eq!(
        dataset.bounds(),
        Some(DateRange::new(
            NaiveDate::from_ymd_opt(2017, 4, 11).unwrap(),
            NaiveDate::from_ymd_opt(2017, 10, 2).unwrap(),
        ))
    );
}

#[test]
fn unparseable_purchase_timestamp_aborts_the_load() {
    let file = write_fixture(&[
        "o1,c1,delivered,not-a-date,,,,,1,p1,s1,,10,1,1,boleto,1,10.00,r1,5,,,,,u1,1,x,SP,2,y,SP,a,toys",
    ]);

    let err = load_csv(file.path(), LoadOptions::default()).unwrap_err();
    match err {
        DatasetError::InvalidField { line, column, value, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, "order_purchase_timestamp");
            assert_eq!(value, "not-a-date");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_payment_value_aborts_the_load() {
    let file = write_fixture(&[
        "o1,c1,delivered,2018-01-01 10:00:00,,,,,1,p1,s1,,10,1,1,boleto,1,ten,r1,5,,,,,u1,1,x,SP,2,y,SP,a,toys",
    ]);

    let err = load_csv(file.path(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, DatasetError::InvalidField { ref column, .. } if column == "payment_value"));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let err = load_csv(
        std::path::Path::new("/definitely/not/here.csv"),
        LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DatasetError::Open { .. }));
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}
