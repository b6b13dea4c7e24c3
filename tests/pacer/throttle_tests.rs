// tests/pacer/throttle_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::recorder::Recorder;
    use crate::fixtures::test_clock::TestClock;
    use flux_pacer::{ThrottleDecision, Throttler, throttle};
    use std::time::Duration;

    // Leading-edge algorithm tests
    #[test]
    fn first_request_always_fires() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let throttler = throttle(recorder.operation(), 2_000, clock).unwrap();

        assert_eq!(throttler.call("submit"), ThrottleDecision::Fired);
        assert_eq!(recorder.calls(), vec!["submit"]);
    }

    #[test]
    fn requests_inside_window_are_dropped() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let throttler = throttle(recorder.operation(), 2_000, clock.clone()).unwrap();

        // calls at t = 0, 100, 500, 1999
        for (at, n) in [(0, 0u32), (100, 1), (500, 2), (1_999, 3)] {
            clock.set_millis(at);
            throttler.call(n);
        }
        assert_eq!(recorder.calls(), vec![0]);

        // firing resumes once the window closes
        clock.set_millis(2_000);
        assert!(throttler.call(4).fired());
        assert_eq!(recorder.calls(), vec![0, 4]);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let window = Duration::from_millis(1_000);
        let throttler = Throttler::new(recorder.operation(), window, clock.clone());

        assert!(throttler.call(0u32).fired());
        clock.set_millis(1_000);
        assert!(throttler.call(1).fired());
        clock.set_millis(1_999);
        assert!(!throttler.call(2).fired());
        clock.set_millis(2_000);
        assert!(throttler.call(3).fired());

        assert_eq!(recorder.calls(), vec![0, 1, 3]);
    }

    #[test]
    fn dropped_requests_do_not_extend_the_window() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let window = Duration::from_millis(1_000);
        let throttler = Throttler::new(recorder.operation(), window, clock.clone());

        throttler.call(0u32);
        for _ in 0..9 {
            clock.advance_millis(100);
            throttler.call(1);
        }
        assert_eq!(throttler.last_fire(), Some(0));

        clock.advance_millis(100);
        assert!(throttler.call(2).fired());
        assert_eq!(recorder.calls(), vec![0, 2]);
    }

    #[test]
    fn no_trailing_call_for_dropped_requests() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let window = Duration::from_millis(1_000);
        let throttler = Throttler::new(recorder.operation(), window, clock.clone());

        throttler.call("leading");
        clock.set_millis(999);
        throttler.call("dropped");

        // time passing alone never replays the dropped request
        clock.set_millis(10_000);
        assert_eq!(recorder.calls(), vec!["leading"]);
    }

    #[test]
    fn zero_delay_fires_every_request() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let throttler = throttle(recorder.operation(), 0, clock).unwrap();

        for n in 0..5u32 {
            assert!(throttler.call(n).fired());
        }
        assert_eq!(recorder.calls(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn calls_per_span_stay_within_bound() {
        let clock = TestClock::new(0);
        let recorder = Recorder::new();
        let window = Duration::from_millis(300);
        let throttler = Throttler::new(recorder.operation(), window, clock.clone());

        // a request every 7ms for 10 seconds
        let span_ms = 10_000u64;
        let mut at = 0;
        while at <= span_ms {
            clock.set_millis(at);
            throttler.call(at);
            at += 7;
        }

        let bound = span_ms.div_ceil(300) as usize + 1;
        assert!(recorder.count() <= bound);

        let fired = recorder.calls();
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= 300);
        }
    }

    #[test]
    fn dropped_decision_reports_time_until_window_closes() {
        let clock = TestClock::new(5_000);
        let throttler = Throttler::new(|_: ()| {}, Duration::from_millis(2_000), clock.clone());

        throttler.call(());
        clock.advance_millis(1_250);
        assert_eq!(
            throttler.call(()),
            ThrottleDecision::Dropped {
                retry_after: Duration::from_millis(750)
            }
        );
    }

    #[test]
    fn forwards_tuple_arguments() {
        let clock = TestClock::new(0);
        let recorder = Recorder::<(String, i32, Option<char>)>::new();
        let throttler = Throttler::new(recorder.operation(), Duration::from_millis(10), clock);

        throttler.call(("click".to_string(), -3, Some('k')));
        assert_eq!(
            recorder.calls(),
            vec![("click".to_string(), -3, Some('k'))]
        );
    }
}
