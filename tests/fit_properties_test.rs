// Property tests for the uniform, centered fit
use favicon_mcp_server::favicon::{FitTransform, IntrinsicSize};
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

fn intrinsic() -> impl Strategy<Value = IntrinsicSize> {
    (0.01f64..10_000.0, 0.01f64..10_000.0).prop_map(|(width, height)| IntrinsicSize { width, height })
}

proptest! {
    #[test]
    fn fit_never_overflows_and_touches_an_edge(size in intrinsic(), target in 1u32..=1024) {
        let fit = FitTransform::compute(size, target);
        let s = target as f64;
        let tolerance = s * EPSILON;

        prop_assert!(fit.scale > 0.0);
        prop_assert!(fit.scale * size.width.max(size.height) <= s + tolerance);

        let touches_width = (fit.scale * size.width - s).abs() <= tolerance;
        let touches_height = (fit.scale * size.height - s).abs() <= tolerance;
        prop_assert!(touches_width || touches_height);
    }

    #[test]
    fn offsets_are_non_negative_and_center_the_artwork(size in intrinsic(), target in 1u32..=1024) {
        let fit = FitTransform::compute(size, target);
        let s = target as f64;
        let tolerance = s * EPSILON;

        prop_assert!(fit.offset_x >= 0.0);
        prop_assert!(fit.offset_y >= 0.0);
        prop_assert!((2.0 * fit.offset_x + fit.scale * size.width - s).abs() <= tolerance);
        prop_assert!((2.0 * fit.offset_y + fit.scale * size.height - s).abs() <= tolerance);
    }

    #[test]
    fn square_sources_get_equal_offsets(side in 0.01f64..10_000.0, target in 1u32..=1024) {
        let fit = FitTransform::compute(IntrinsicSize { width: side, height: side }, target);
        prop_assert_eq!(fit.offset_x, fit.offset_y);
        prop_assert!(fit.offset_x <= target as f64 * EPSILON);
    }
}
