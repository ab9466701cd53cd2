/// Asserts that the `i`-th indexed flower holds `expected` nectar (within 1e-5).
#[macro_export]
macro_rules! assert_nectar {
    ($env:expr, $i:expr, $expected:expr) => {
        let flower = &$env.area.index.flowers()[$i];
        assert!(
            (flower.nectar - $expected).abs() < 1e-5,
            "Flower {} nectar {} is not {}",
            $i,
            flower.nectar,
            $expected
        );
    };
}

/// Asserts that the agent currently tracks the `i`-th indexed flower.
#[macro_export]
macro_rules! assert_tracking {
    ($env:expr, $i:expr) => {
        let handle = $env.agent.nearest_flower().expect("Agent tracks no flower");
        assert_eq!(handle.index, $i as u32, "Agent tracks the wrong flower");
        assert!(
            $env.area.flower(handle).is_some(),
            "Tracked handle is stale"
        );
    };
}
