mod common;

use chart_pipeline::api::{ApplyOutcome, PipelineState, VALIDATION_FAILED_NOTICE};
use chart_pipeline::core::{ChartConfigPatch, ChartKind, MissingField, OutputFormat};
use chart_pipeline::PipelineError;
use common::{block_on, controller_with_columns};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = ChartKind> {
    proptest::sample::select(ChartKind::ALL.to_vec())
}

fn any_format() -> impl Strategy<Value = OutputFormat> {
    proptest::sample::select(OutputFormat::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn missing_x_column_never_reaches_the_service(
        kind in any_kind(),
        format in any_format(),
        blank_x in prop_oneof![Just(None), Just(Some(String::new()))],
    ) {
        block_on(async {
            let mut controller = controller_with_columns("Sheet1").await;
            let mut patch = ChartConfigPatch::new().kind(kind).y_column("Sales").format(format);
            if let Some(x) = blank_x {
                patch = patch.x_column(x);
            }
            prop_assert!(controller.configure_chart(patch));
            let calls_before = controller.service().call_count();

            let result = controller.generate().map(|_| ());
            prop_assert_eq!(result, Err(PipelineError::ValidationFailed(MissingField::XColumn)));
            prop_assert_eq!(controller.service().call_count(), calls_before);
            prop_assert_eq!(controller.state(), PipelineState::ColumnsReady);
            prop_assert_eq!(controller.notices().len(), 1);
            prop_assert_eq!(controller.notices()[0].message, VALIDATION_FAILED_NOTICE);
            Ok(())
        })?;
    }

    #[test]
    fn y_column_requirement_follows_chart_kind(
        kind in any_kind(),
        format in any_format(),
    ) {
        block_on(async {
            let mut controller = controller_with_columns("Sheet1").await;
            prop_assert!(controller.configure_chart(
                ChartConfigPatch::new().kind(kind).x_column("Category").format(format)
            ));

            let result = controller.generate();
            if kind.requires_y_column() {
                prop_assert_eq!(
                    result.map(|_| ()),
                    Err(PipelineError::ValidationFailed(MissingField::YColumn))
                );
                prop_assert_eq!(controller.service().generate_calls(), 0);
            } else {
                let pending = match result {
                    Ok(pending) => pending,
                    Err(err) => return Err(TestCaseError::fail(format!("rejected: {err}"))),
                };
                prop_assert_eq!(controller.drive(pending).await, ApplyOutcome::Applied);
                let output = controller.output();
                prop_assert!(output.is_some());
                prop_assert_eq!(
                    output.and_then(|o| o.artifact()).is_some(),
                    format.is_binary()
                );
            }
            Ok(())
        })?;
    }

    #[test]
    fn fully_configured_charts_always_generate(
        kind in any_kind(),
        format in any_format(),
        title in "[A-Za-z ]{0,24}",
    ) {
        block_on(async {
            let mut controller = controller_with_columns("Sheet1").await;
            prop_assert!(controller.configure_chart(
                ChartConfigPatch::new()
                    .kind(kind)
                    .x_column("Category")
                    .y_column("Sales")
                    .title(title.clone())
                    .format(format)
            ));
            let pending = match controller.generate() {
                Ok(pending) => pending,
                Err(err) => return Err(TestCaseError::fail(format!("rejected: {err}"))),
            };
            prop_assert_eq!(controller.drive(pending).await, ApplyOutcome::Applied);
            prop_assert_eq!(controller.state(), PipelineState::ResultReady);
            prop_assert_eq!(&controller.session().config().title, &title);
            Ok(())
        })?;
    }
}
