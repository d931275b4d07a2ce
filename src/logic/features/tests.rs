//! Integration tests for the feature schema and record assembly.
//!
//! Checks that a record assembled for any disease lines up column-for-column
//! with the fitted layout.

#[cfg(test)]
mod integration_tests {
    use crate::logic::disease::Disease;
    use crate::logic::features::{
        layout::{column_index, lag_column_index, LAG_BASE_INDEX},
        record::{FeatureRecord, LagTriplet},
    };

    /// Every assembled value must land on the column named for it.
    #[test]
    fn test_record_aligns_with_layout_for_every_disease() {
        for disease in Disease::ALL {
            let record = FeatureRecord::assemble(
                disease,
                "Kaolack",
                22,
                3,
                LagTriplet::new(11, 12, 13),
            );

            let row = record.numeric_row();

            for lag in 1..=3 {
                let column = format!("{}_lag{}", disease.lag_prefix(), lag);
                let index = column_index(&column).expect("lag column missing from layout");
                assert_eq!(index, lag_column_index(disease, lag));

                // numeric_row drops the categorical column 0
                assert_eq!(row[index - 1], (10 + lag) as f32, "column {column}");
            }
        }
    }

    /// The assembled row carries exactly three non-zero lag values.
    #[test]
    fn test_only_selected_triplet_is_non_zero_capable() {
        let record = FeatureRecord::assemble(
            Disease::Dengue,
            "Saint-Louis",
            40,
            5,
            LagTriplet::new(1, 1, 1),
        );

        let non_zero = record.lag_slots().iter().filter(|&&v| v > 0).count();
        assert_eq!(non_zero, 3);

        let base = lag_column_index(Disease::Dengue, 1) - LAG_BASE_INDEX;
        assert_eq!(&record.lag_slots()[base..base + 3], &[1, 1, 1]);
    }

    /// Zero lags everywhere is a valid record (the form defaults).
    #[test]
    fn test_all_zero_lags_is_valid() {
        let record =
            FeatureRecord::assemble(Disease::Meningitis, "Bakel", 1, 0, LagTriplet::default());

        assert!(record.lag_slots().iter().all(|&v| v == 0));
        assert_eq!(record.week_of_year, 1);
        assert_eq!(record.day_of_week, 0);
    }
}
