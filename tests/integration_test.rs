mod common;

use std::sync::Arc;
use std::time::Duration;

use chapter_report::error::{AppError, SessionError};
use chapter_report::infrastructure::DomTableExtractor;
use chapter_report::models::Scope;
use chapter_report::{logger, render, App, Config, ScopeFlow, SessionCoordinator, SessionPhase};
use common::{row, test_config, Counters, FakeAuthenticator, FakeLauncher, Tables, BASE_URL};
use tokio_test::assert_ok;

fn url(path: &str) -> String {
    format!("{}/{}", BASE_URL, path)
}

fn member(name: &str, bucks: &str, referrals: &str, sessions: &str, posts: &str) -> Vec<String> {
    row(&[name, "", "", bucks, referrals, "0", sessions, "0", posts])
}

fn chapter_tables() -> Tables {
    let mut tables = Tables::new();
    tables.insert(
        url("reports/sm"),
        vec![
            member("Jane Doe", "$0.00", "1", "2", "4"),
            member("Amy Lee", "$12.50", "0", "1", "0"),
            member("Bob Roe", "$0.00", "0", "0", "0"),
            member("Executive Producer", "$0.00", "3", "9", "9"),
        ],
    );
    tables.insert(
        url("reports/sessions"),
        vec![
            row(&["Jane Doe", "John Roe", "Activity Call"]),
            row(&["No Data"]),
            row(&["Amy Lee", "Executive Producer Bob", "Visitor Session"]),
        ],
    );
    tables.insert(
        url("reports/events"),
        vec![
            row(&["Jane Doe", "Host", "Mixer"]),
            row(&["Amy Lee", "Host", "Listening/Viewing"]),
        ],
    );
    tables.insert(url("reports/visitors"), vec![row(&["Zed Quinn"])]);
    tables
}

fn app(counters: &Arc<Counters>, tables: Tables, authenticator: FakeAuthenticator) -> App {
    App::with_parts(
        test_config(),
        Arc::new(FakeLauncher::new(counters.clone(), tables)),
        Arc::new(authenticator),
        Arc::new(DomTableExtractor::new()),
    )
}

#[tokio::test]
async fn chapter_report_end_to_end() {
    let counters = Arc::new(Counters::default());
    let app = app(&counters, chapter_tables(), FakeAuthenticator::new(counters.clone()));

    let report = assert_ok!(app.chapter_report().await);
    assert!(report.is_complete());

    let members = report.members.as_ref().unwrap();
    assert_eq!(members.summary.total_members, 3);
    assert_eq!(members.members_list, vec!["Amy L.", "Bob R.", "Jane D."]);
    assert_eq!(members.zero_activity_list, vec!["Bob R."]);

    let sessions = report.sessions.as_ref().unwrap();
    assert_eq!(sessions.summary.total, 2);
    assert_eq!(sessions.summary.counts.activity, 1);
    assert_eq!(sessions.summary.counts.visitor, 1);
    assert_eq!(sessions.submitted_by, vec!["Amy L.", "Jane D."]);

    let events = report.events.as_ref().unwrap();
    assert_eq!(events.summary.counts.mixer, 1);
    assert_eq!(events.summary.counts.listening_viewing, 1);

    let social = report.social_media.as_ref().unwrap();
    assert_eq!(social.total_posts, 4);
    assert_eq!(social.avg_posts_per_member, 1.33);

    let referrals = report.referrals_and_business_bucks.as_ref().unwrap();
    assert_eq!(referrals.summary.referrals, 1);
    assert_eq!(referrals.summary.business_bucks, 12.5);
    assert_eq!(report.visitors.as_ref().unwrap().summary.total_visitors, 1);

    // 四个报表域共享一次启动和一次登录
    assert_eq!(Counters::get(&counters.launches), 1);
    assert_eq!(Counters::get(&counters.logins), 1);
    assert_eq!(app.coordinator().open_pages(), 0);
    assert_eq!(Counters::get(&counters.pages_closed), 4);

    let blinded = render::chapter_blinded(&report.blinded(), &chrono::Local::now());
    assert!(blinded.contains("Total Members: 3"));
    assert!(!blinded.contains("Jane D."));

    assert_ok!(app.shutdown().await);
    assert_ok!(app.shutdown().await);
    assert_eq!(app.coordinator().phase().await, SessionPhase::Closed);
    assert_eq!(Counters::get(&counters.browser_closes), 1);
}

#[tokio::test]
async fn missing_table_only_drops_that_fragment() {
    let counters = Arc::new(Counters::default());
    let mut tables = chapter_tables();
    tables.remove(&url("reports/visitors"));
    let app = app(&counters, tables, FakeAuthenticator::new(counters.clone()));

    let report = assert_ok!(app.chapter_report().await);

    assert!(report.visitors.is_none());
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].scope, Scope::Visitors);
    assert!(report.missing[0].reason.contains("找不到预期的数据表"));
    assert!(report.members.is_some());
    assert!(report.sessions.is_some());
    assert!(report.events.is_some());
    // 失败的报表域也归还了页面
    assert_eq!(app.coordinator().open_pages(), 0);

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn authentication_failure_aborts_the_run() {
    let counters = Arc::new(Counters::default());
    let app = app(
        &counters,
        chapter_tables(),
        FakeAuthenticator::new(counters.clone()).rejecting(),
    );

    let err = app.chapter_report().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Session(SessionError::AuthenticationFailed(_))
    ));
    assert!(err.is_session_fatal());
    assert_eq!(Counters::get(&counters.logins), 1);

    // 失败后仍然关闭浏览器
    assert_ok!(app.shutdown().await);
    assert_eq!(Counters::get(&counters.browser_closes), 1);
}

#[tokio::test]
async fn checklist_report_enters_date_range() {
    let counters = Arc::new(Counters::default());
    let mut tables = chapter_tables();
    tables.insert(
        url("checklists"),
        vec![
            row(&["Jane Doe", "Week 2", "01/07/2026"]),
            row(&["Jane Doe", "Week 2", "01/08/2026"]),
        ],
    );
    let app = app(&counters, tables, FakeAuthenticator::new(counters.clone()));

    let report = assert_ok!(app.checklist_report().await);

    assert_eq!(report.summary.total_members, 3);
    assert_eq!(report.summary.total_checklists, 2);
    assert_eq!(report.submitted_by, vec!["Jane D."]);
    assert_eq!(report.missing_list, vec!["Amy L.", "Bob R."]);
    assert_eq!(report.summary.created_percentage, 66.67);
    assert_eq!(report.summary.missing_percentage, 66.67);

    let typed = counters.typed.lock().unwrap().clone();
    assert!(typed.contains(&(
        r#"input[name="date"]"#.to_string(),
        "01/05/2026 - 01/11/2026".to_string()
    )));

    assert_ok!(app.shutdown().await);
}

#[tokio::test]
async fn checklist_waits_for_reload_before_reading_table() {
    let counters = Arc::new(Counters::default());
    let mut tables = Tables::new();
    tables.insert(
        url("checklists"),
        vec![row(&["Jane Doe", "Week 2", "01/07/2026"])],
    );
    let coordinator = Arc::new(SessionCoordinator::new(
        Arc::new(FakeLauncher::new(counters.clone(), tables)),
        Arc::new(FakeAuthenticator::new(counters.clone())),
        Duration::from_secs(2),
    ));
    let flow = ScopeFlow::new(
        coordinator.clone(),
        Arc::new(DomTableExtractor::new()),
        Arc::new(test_config()),
    );

    let entries = assert_ok!(flow.checklist_entries().await);
    assert_eq!(entries.len(), 1);

    // 回车后先等重新加载，再读表格
    assert_eq!(
        counters.actions(),
        vec!["goto", "press_enter", "wait_for_network_idle", "evaluate"]
    );

    assert_ok!(coordinator.shutdown().await);
}

#[tokio::test]
#[ignore] // 需要真实后台和浏览器：cargo test -- --ignored
async fn test_real_dashboard_chapter_report() {
    // 初始化日志
    logger::init(true);

    // 加载配置
    let config = Config::from_env();
    config.validate(false).expect("配置无效");

    let app = App::initialize(config);
    let result = app.chapter_report().await;
    app.shutdown().await.expect("关闭浏览器失败");

    let report = result.expect("生成章节报表失败");
    println!("{}", render::chapter_unblinded(&report));
}
