use webwords_crawler::{async_trait, PageContent, PageParser};
use webwords_profiler::{ProfiledTarget, Profiler};

struct StubParser;

#[async_trait]
impl PageParser for StubParser {
    async fn parse(&self, _url: &str) -> anyhow::Result<PageContent> {
        Ok(PageContent::default())
    }
}

impl ProfiledTarget for StubParser {
    const TARGET: &'static str = "StubParser";
    const PROFILED_METHODS: &'static [&'static str] = &["parse"];
}

fn report(profiler: &Profiler) -> String {
    let mut out = Vec::new();
    profiler.write_report(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn zero_method_target_cannot_be_wrapped() {
    struct Inert;

    impl ProfiledTarget for Inert {
        const TARGET: &'static str = "Inert";
        const PROFILED_METHODS: &'static [&'static str] = &[];
    }

    let profiler = Profiler::new();
    assert!(profiler.wrap(Inert).is_err());
}

#[tokio::test]
async fn profiled_calls_land_in_the_report() {
    let profiler = Profiler::new();
    let parser = profiler.wrap(StubParser).unwrap();

    parser.parse("https://a.test/").await.unwrap();
    parser.parse("https://b.test/").await.unwrap();

    let report = report(&profiler);
    assert!(report.starts_with("Run at "));
    assert!(report.contains("StubParser#parse"));
    assert!(report.contains("(2 calls)"));
    assert!(report.ends_with("\n\n"));
}

#[tokio::test]
async fn failed_calls_are_recorded_and_rethrown() {
    struct FailingParser;

    #[async_trait]
    impl PageParser for FailingParser {
        async fn parse(&self, _url: &str) -> anyhow::Result<PageContent> {
            anyhow::bail!("broken")
        }
    }

    impl ProfiledTarget for FailingParser {
        const TARGET: &'static str = "FailingParser";
        const PROFILED_METHODS: &'static [&'static str] = &["parse"];
    }

    let profiler = Profiler::new();
    let parser = profiler.wrap(FailingParser).unwrap();

    assert!(parser.parse("https://a.test/").await.is_err());

    let report = report(&profiler);
    assert!(report.contains("FailingParser#parse"));
    assert!(report.contains("(1 call)"));
}

#[tokio::test]
async fn unprofiled_methods_pass_through_unrecorded() {
    struct SelectiveParser;

    #[async_trait]
    impl PageParser for SelectiveParser {
        async fn parse(&self, _url: &str) -> anyhow::Result<PageContent> {
            Ok(PageContent::default())
        }
    }

    impl ProfiledTarget for SelectiveParser {
        const TARGET: &'static str = "SelectiveParser";
        const PROFILED_METHODS: &'static [&'static str] = &["warm_up"];
    }

    let profiler = Profiler::new();
    let parser = profiler.wrap(SelectiveParser).unwrap();

    parser.parse("https://a.test/").await.unwrap();
    parser.measure("warm_up", |_inner| ());
    parser.measure("parse", |_inner| ());

    let report = report(&profiler);
    assert!(report.contains("SelectiveParser#warm_up"));
    assert!(!report.contains("SelectiveParser#parse"));
}
