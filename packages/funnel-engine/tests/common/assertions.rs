//! Custom assertions for funnel tables

use funnel_engine::ConversionRow;

/// Assert the conversion laws on every partition of `rows`
pub fn assert_conversion_laws(rows: &[ConversionRow]) {
    for (i, row) in rows.iter().enumerate() {
        let first_in_partition = i == 0 || rows[i - 1].key != row.key;

        if first_in_partition {
            assert_eq!(row.overall_conversion, Some(1.0), "row {i}: overall at first stage");
            assert_eq!(row.step_conversion, None, "row {i}: step at first stage");
            continue;
        }

        for ratio in [row.step_conversion, row.overall_conversion].into_iter().flatten() {
            assert!(ratio.is_finite(), "row {i}: non-finite ratio {ratio}");
        }

        let prev = &rows[i - 1];
        if prev.value == 0 {
            assert_eq!(row.step_conversion, None, "row {i}: step after zero");
        }

        if let (Some(step), Some(overall), Some(prev_overall)) = (
            row.step_conversion,
            row.overall_conversion,
            prev.overall_conversion,
        ) {
            if prev_overall != 0.0 {
                let expected = overall / prev_overall;
                assert!(
                    (step - expected).abs() < 1e-9,
                    "row {i}: step {step} != overall ratio {expected}"
                );
            }
        }
    }
}
