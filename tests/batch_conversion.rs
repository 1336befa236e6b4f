//! Integration test for converting a CSV price-list export end to end.

use std::fs;

use testresult::TestResult;

use promo_depth::prelude::*;

const INPUT: &str = "\
SKU,Product,Price & Promo Details
1001,Red Blend,400 - Save 33%
1002,Lager 6pk,200 - Buy 2 & Get 1 Free
1003,Shiraz,100 - 92 Decanter Points
1004,Gin,100 - 90% off
1005
";

#[test]
fn test_convert_csv_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("prices.csv");
    let output = dir.path().join("Promo_Depth_Calculated.csv");

    fs::write(&input, INPUT)?;

    let sheet = DepthSheet::from_path(&input)?;

    assert_eq!(sheet.column(), "Price & Promo Details");
    assert_eq!(sheet.len(), 5);

    let flagged: Vec<usize> = sheet.flagged().map(|(row, _)| row).collect();

    assert_eq!(flagged, vec![3]);

    sheet.write_path(&output)?;

    assert_eq!(
        fs::read_to_string(&output)?,
        "Price & Promo Details,Promo Depth\n\
         400 - Save 33%,33.00\n\
         200 - Buy 2 & Get 1 Free,33.33\n\
         100 - 92 Decanter Points,0.00\n\
         100 - 90% off,90.00\n\
         ,0.00\n"
    );

    Ok(())
}

#[test]
fn test_missing_promo_column() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("prices.csv");

    fs::write(&input, "SKU,Price\n1,400\n")?;

    assert!(matches!(
        DepthSheet::from_path(&input),
        Err(BatchError::MissingColumn)
    ));

    Ok(())
}

#[test]
fn test_missing_input_file() {
    assert!(matches!(
        DepthSheet::from_path("no/such/prices.csv"),
        Err(BatchError::Io(_))
    ));
}
