use crate::core::context::AppContext;
use crate::db::log::ttlog_quiet;
use crate::errors::{LifecycleError, LifecycleResult};
use crate::models::session::Session;
use crate::store::SessionRepository;
use crate::utils::formatting::{format_date, format_time};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// What today looks like for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodayState {
    /// Nothing recorded today and no open session.
    None,
    /// An open session (possibly started on an earlier day).
    Working(Session),
    /// Today's session is closed.
    Done(Session),
}

impl TodayState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            TodayState::None => None,
            TodayState::Working(s) | TodayState::Done(s) => Some(s),
        }
    }
}

/// Clock-in / clock-out / edit rules.
///
/// - one session per user and day
/// - at most one open session per user, across days
pub struct ClockLogic;

impl ClockLogic {
    pub fn clock_in(ctx: &AppContext) -> LifecycleResult<Session> {
        Self::clock_in_at(ctx, Local::now())
    }

    pub fn clock_in_at(ctx: &AppContext, now: DateTime<Local>) -> LifecycleResult<Session> {
        let _guard = ctx.try_busy()?;
        Self::start(ctx, now)
    }

    pub fn clock_out(ctx: &AppContext) -> LifecycleResult<Session> {
        Self::clock_out_at(ctx, Local::now())
    }

    pub fn clock_out_at(ctx: &AppContext, now: DateTime<Local>) -> LifecycleResult<Session> {
        let _guard = ctx.try_busy()?;
        Self::stop(ctx, now)
    }

    /// The home button: clock in, clock out, or refuse when today is done.
    pub fn toggle(ctx: &AppContext) -> LifecycleResult<Session> {
        Self::toggle_at(ctx, Local::now())
    }

    pub fn toggle_at(ctx: &AppContext, now: DateTime<Local>) -> LifecycleResult<Session> {
        let _guard = ctx.try_busy()?;
        match Self::today_state(ctx, now.date_naive())? {
            TodayState::None => Self::start(ctx, now),
            TodayState::Working(_) => Self::stop(ctx, now),
            TodayState::Done(_) => Err(LifecycleError::AlreadyDoneToday),
        }
    }

    /// An open session wins over today's record.
    pub fn today_state(ctx: &AppContext, today: NaiveDate) -> LifecycleResult<TodayState> {
        let user = ctx.require_user()?;
        let repo = ctx.repo();

        if let Some(working) = repo.working_session(&user.id)? {
            return Ok(TodayState::Working(working));
        }
        Ok(match repo.session_by_date(&user.id, today)? {
            Some(s) => TodayState::Done(s),
            None => TodayState::None,
        })
    }

    /// Replace the start and end times of `session`.
    ///
    /// Unchanged values are a no-op and are not saved. The state follows
    /// the end time: no end means WORKING. Clearing both times is refused,
    /// and a session may only reopen while no other session of the user is
    /// open.
    pub fn edit_times(
        ctx: &AppContext,
        session: &Session,
        new_start: Option<DateTime<Utc>>,
        new_end: Option<DateTime<Utc>>,
    ) -> LifecycleResult<Session> {
        let user = ctx.require_user()?;
        if session.user_id != user.id {
            return Err(LifecycleError::InvalidEdit(
                "session belongs to another user".into(),
            ));
        }

        if new_start == session.start_at && new_end == session.end_at {
            return Ok(session.clone());
        }

        if new_start.is_none() && new_end.is_none() {
            return Err(LifecycleError::InvalidEdit(
                "a start or end time is required".into(),
            ));
        }

        if new_end.is_none() {
            let repo = ctx.repo();
            for view in [repo, repo.local() as &dyn SessionRepository] {
                if let Some(open) = view.working_session(&user.id)?
                    && open.id != session.id
                {
                    return Err(LifecycleError::AlreadyWorking);
                }
            }
        }

        let mut updated = session.clone();
        updated.set_times(new_start, new_end);
        ctx.repo().save(&updated)?;

        ttlog_quiet(
            ctx.conn(),
            "edit",
            &updated.work_date_str(),
            &format!(
                "Times set to {} - {} ({})",
                format_time(updated.start_at),
                format_time(updated.end_at),
                updated.state.to_db_str()
            ),
        );

        Ok(updated)
    }

    fn start(ctx: &AppContext, now: DateTime<Local>) -> LifecycleResult<Session> {
        let user = ctx.require_user()?;
        let repo = ctx.repo();

        // the local schema enforces the same two rules whatever the read policy
        for view in [repo, repo.local() as &dyn SessionRepository] {
            if view.working_session(&user.id)?.is_some() {
                return Err(LifecycleError::AlreadyWorking);
            }
            if view.session_by_date(&user.id, now.date_naive())?.is_some() {
                return Err(LifecycleError::AlreadyRecordedToday);
            }
        }

        let session = Session::clock_in(&user.id, now);
        repo.save(&session)?;

        ttlog_quiet(
            ctx.conn(),
            "in",
            &format_date(session.work_date),
            &format!("Clocked in at {}", format_time(session.start_at)),
        );

        Ok(session)
    }

    fn stop(ctx: &AppContext, now: DateTime<Local>) -> LifecycleResult<Session> {
        let user = ctx.require_user()?;
        let repo = ctx.repo();

        let mut session = match repo.working_session(&user.id)? {
            Some(s) => s,
            // an open local row the remote never received must stay closable
            None => repo
                .local()
                .working_session(&user.id)?
                .ok_or(LifecycleError::NotWorking)?,
        };

        session.set_times(session.start_at, Some(now.with_timezone(&Utc)));
        repo.save(&session)?;

        ttlog_quiet(
            ctx.conn(),
            "out",
            &format_date(session.work_date),
            &format!("Clocked out at {}", format_time(session.end_at)),
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use crate::models::session_state::SessionState;
    use crate::models::user::AuthUser;
    use crate::remote::Mirror;
    use crate::store::LocalStore;
    use chrono::TimeZone;

    fn ctx_for(user: Option<&str>) -> AppContext {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let repo = Box::new(LocalStore::new(pool, Mirror::disabled()));
        let user = user.map(|id| AuthUser {
            id: id.to_string(),
            email: None,
        });
        AppContext::from_parts(Config::default(), repo, user)
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 9, day, h, m, 0).unwrap()
    }

    fn count_sessions(ctx: &AppContext) -> i64 {
        ctx.conn()
            .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn clock_in_then_out() {
        let ctx = ctx_for(Some("u1"));

        let s = ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        assert_eq!(s.state, SessionState::Working);
        assert_eq!(s.end_at, None);

        let done = ClockLogic::clock_out_at(&ctx, at(1, 18, 0)).unwrap();
        assert_eq!(done.id, s.id);
        assert_eq!(done.state, SessionState::Done);
        assert_eq!(done.end_at, Some(at(1, 18, 0).with_timezone(&Utc)));
    }

    #[test]
    fn second_clock_in_while_working_fails() {
        let ctx = ctx_for(Some("u1"));
        ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();

        let err = ClockLogic::clock_in_at(&ctx, at(1, 10, 0)).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyWorking));
        assert_eq!(count_sessions(&ctx), 1);
    }

    #[test]
    fn open_session_blocks_next_day_clock_in() {
        let ctx = ctx_for(Some("u1"));
        ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();

        let err = ClockLogic::clock_in_at(&ctx, at(2, 9, 0)).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyWorking));
    }

    #[test]
    fn clock_in_again_same_day_fails() {
        let ctx = ctx_for(Some("u1"));
        ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        ClockLogic::clock_out_at(&ctx, at(1, 17, 0)).unwrap();

        let err = ClockLogic::clock_in_at(&ctx, at(1, 19, 0)).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyRecordedToday));
        assert_eq!(count_sessions(&ctx), 1);
    }

    #[test]
    fn clock_out_without_session_fails() {
        let ctx = ctx_for(Some("u1"));
        let err = ClockLogic::clock_out_at(&ctx, at(1, 18, 0)).unwrap_err();
        assert!(matches!(err, LifecycleError::NotWorking));
    }

    #[test]
    fn cross_day_clock_out_closes_yesterdays_session() {
        let ctx = ctx_for(Some("u1"));
        let s = ClockLogic::clock_in_at(&ctx, at(1, 22, 0)).unwrap();
        let done = ClockLogic::clock_out_at(&ctx, at(2, 6, 0)).unwrap();

        assert_eq!(done.id, s.id);
        assert_eq!(done.work_date, s.work_date);
    }

    #[test]
    fn users_do_not_interfere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.sqlite").to_string_lossy().to_string();

        let ctx_on_file = |id: &str| {
            let pool = DbPool::new(&path).unwrap();
            init_db(&pool.conn).unwrap();
            let repo = Box::new(LocalStore::new(pool, Mirror::disabled()));
            let user = AuthUser {
                id: id.to_string(),
                email: None,
            };
            AppContext::from_parts(Config::default(), repo, Some(user))
        };

        let a = ctx_on_file("a");
        let b = ctx_on_file("b");
        ClockLogic::clock_in_at(&a, at(1, 9, 0)).unwrap();
        assert!(ClockLogic::clock_in_at(&b, at(1, 9, 0)).is_ok());
        assert_eq!(count_sessions(&a), 2);
    }

    #[test]
    fn mutations_require_a_user() {
        let ctx = ctx_for(None);
        assert!(matches!(
            ClockLogic::clock_in_at(&ctx, at(1, 9, 0)),
            Err(LifecycleError::MissingUser)
        ));
        assert!(matches!(
            ClockLogic::toggle_at(&ctx, at(1, 9, 0)),
            Err(LifecycleError::MissingUser)
        ));
    }

    #[test]
    fn toggle_walks_none_working_done() {
        let ctx = ctx_for(Some("u1"));
        assert_eq!(
            ClockLogic::today_state(&ctx, at(1, 0, 0).date_naive()).unwrap(),
            TodayState::None
        );

        let s = ClockLogic::toggle_at(&ctx, at(1, 9, 0)).unwrap();
        assert!(s.is_working());

        let s = ClockLogic::toggle_at(&ctx, at(1, 18, 0)).unwrap();
        assert!(!s.is_working());
        assert!(matches!(
            ClockLogic::today_state(&ctx, at(1, 0, 0).date_naive()).unwrap(),
            TodayState::Done(_)
        ));

        let err = ClockLogic::toggle_at(&ctx, at(1, 19, 0)).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyDoneToday));
    }

    #[test]
    fn toggle_is_refused_while_busy() {
        let ctx = ctx_for(Some("u1"));
        let _held = ctx.try_busy().unwrap();
        assert!(matches!(
            ClockLogic::toggle_at(&ctx, at(1, 9, 0)),
            Err(LifecycleError::Busy)
        ));
    }

    #[test]
    fn edit_roundtrip_and_state_flip() {
        let ctx = ctx_for(Some("u1"));
        ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        let done = ClockLogic::clock_out_at(&ctx, at(1, 18, 0)).unwrap();

        let start = Some(at(1, 8, 30).with_timezone(&Utc));
        let end = Some(at(1, 19, 15).with_timezone(&Utc));
        let edited = ClockLogic::edit_times(&ctx, &done, start, end).unwrap();

        let reread = ctx
            .repo()
            .session_by_date("u1", done.work_date)
            .unwrap()
            .unwrap();
        assert_eq!(reread.start_at, start);
        assert_eq!(reread.end_at, end);
        assert_eq!(reread.state, SessionState::Done);
        assert_eq!(reread, edited);

        // clearing the end reopens the session
        let reopened = ClockLogic::edit_times(&ctx, &edited, start, None).unwrap();
        assert_eq!(reopened.state, SessionState::Working);
        assert_eq!(
            ctx.repo().working_session("u1").unwrap().map(|s| s.id),
            Some(done.id)
        );
    }

    #[test]
    fn unchanged_edit_is_a_noop() {
        let ctx = ctx_for(Some("u1"));
        let s = ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        let out = ClockLogic::edit_times(&ctx, &s, s.start_at, s.end_at).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn edit_clearing_both_times_is_refused() {
        let ctx = ctx_for(Some("u1"));
        let s = ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        let err = ClockLogic::edit_times(&ctx, &s, None, None).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidEdit(_)));
        assert_eq!(count_sessions(&ctx), 1);
    }

    #[test]
    fn edit_without_start_but_with_end_is_done() {
        let ctx = ctx_for(Some("u1"));
        let s = ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        let end = Some(at(1, 18, 0).with_timezone(&Utc));

        let edited = ClockLogic::edit_times(&ctx, &s, None, end).unwrap();
        assert_eq!(edited.state, SessionState::Done);
        assert_eq!(edited.start_at, None);
        assert_eq!(ctx.repo().working_session("u1").unwrap(), None);
    }

    #[test]
    fn reopening_while_another_is_open_fails() {
        let ctx = ctx_for(Some("u1"));
        ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
        let first = ClockLogic::clock_out_at(&ctx, at(1, 18, 0)).unwrap();
        ClockLogic::clock_in_at(&ctx, at(2, 9, 0)).unwrap();

        let err = ClockLogic::edit_times(&ctx, &first, first.start_at, None).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyWorking));
    }

    mod remote_backed {
        use super::*;
        use crate::remote::fake::FakeRemote;
        use crate::remote::{RemoteRow, RemoteSessions};
        use crate::store::{ReadPolicy, build_repository};
        use std::sync::Arc;

        /// Context for "u1" over `policy`; with `mirrored`, local writes
        /// reach `remote` once [`settle`] has run.
        fn ctx_over(policy: ReadPolicy, remote: &Arc<FakeRemote>, mirrored: bool) -> AppContext {
            let pool = DbPool::in_memory().unwrap();
            init_db(&pool.conn).unwrap();

            let remote: Arc<dyn RemoteSessions> = remote.clone();
            let mirror = if mirrored {
                Mirror::new(Some(remote.clone()), Some("u1".into()))
            } else {
                Mirror::disabled()
            };
            let repo = build_repository(policy, LocalStore::new(pool, mirror), Some(remote)).unwrap();
            let user = AuthUser {
                id: "u1".into(),
                email: None,
            };
            AppContext::from_parts(Config::default(), repo, Some(user))
        }

        fn settle(ctx: &AppContext) {
            ctx.repo().local().mirror().drain();
        }

        #[test]
        fn authoritative_refusals_hold_when_remote_lags() {
            // nothing is mirrored: the remote never sees the local rows
            let remote = Arc::new(FakeRemote::default());
            let ctx = ctx_over(ReadPolicy::Remote, &remote, false);

            ClockLogic::clock_in_at(&ctx, at(1, 9, 0)).unwrap();
            assert!(matches!(
                ClockLogic::clock_in_at(&ctx, at(1, 10, 0)),
                Err(LifecycleError::AlreadyWorking)
            ));

            let done = ClockLogic::clock_out_at(&ctx, at(1, 18, 0)).unwrap();
            assert_eq!(done.state, SessionState::Done);

            assert!(matches!(
                ClockLogic::clock_in_at(&ctx, at(1, 19, 0)),
                Err(LifecycleError::AlreadyRecordedToday)
            ));
            assert_eq!(count_sessions(&ctx), 1);
        }

        #[test]
        fn authoritative_with_mirror_full_day() {
            let remote = Arc::new(FakeRemote::default());
            let ctx = ctx_over(ReadPolicy::Remote, &remote, true);

            let s = ClockLogic::clock_in_at(&ctx, at(2, 9, 0)).unwrap();
            settle(&ctx);
            assert_eq!(remote.snapshot()[0].state, SessionState::Working);

            let done = ClockLogic::clock_out_at(&ctx, at(2, 18, 0)).unwrap();
            settle(&ctx);
            assert_eq!(done.id, s.id);
            assert_eq!(remote.snapshot()[0].state, SessionState::Done);

            assert!(matches!(
                ClockLogic::clock_in_at(&ctx, at(2, 19, 0)),
                Err(LifecycleError::AlreadyRecordedToday)
            ));
            assert_eq!(count_sessions(&ctx), 1);
        }

        #[test]
        fn authoritative_offline_remote_is_a_store_error() {
            let remote = Arc::new(FakeRemote::offline());
            let ctx = ctx_over(ReadPolicy::Remote, &remote, false);

            assert!(matches!(
                ClockLogic::clock_in_at(&ctx, at(1, 9, 0)),
                Err(LifecycleError::Store(_))
            ));
            assert_eq!(count_sessions(&ctx), 0);
        }

        #[test]
        fn merged_clock_out_updates_adopted_local_row() {
            let remote = Arc::new(FakeRemote::default());
            let ctx = ctx_over(ReadPolicy::Merged, &remote, true);

            let s = ClockLogic::clock_in_at(&ctx, at(3, 9, 0)).unwrap();
            settle(&ctx);

            // the open session now comes back from the remote and adopts the local id
            let open = ctx.repo().working_session("u1").unwrap().unwrap();
            assert_eq!(open.id, s.id);

            let done = ClockLogic::clock_out_at(&ctx, at(3, 20, 0)).unwrap();
            settle(&ctx);
            assert_eq!(done.id, s.id);
            assert_eq!(count_sessions(&ctx), 1);

            let rows = remote.snapshot();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].end_at, Some(at(3, 20, 0).with_timezone(&Utc)));
        }

        #[test]
        fn merged_closes_session_opened_on_another_device() {
            let started = at(4, 8, 0);
            let remote = Arc::new(FakeRemote::with_rows(vec![RemoteRow {
                user_id: "u1".into(),
                work_date: started.date_naive(),
                start_at: Some(started.with_timezone(&Utc)),
                end_at: None,
                state: SessionState::Working,
            }]));
            let ctx = ctx_over(ReadPolicy::Merged, &remote, true);

            assert!(matches!(
                ClockLogic::clock_in_at(&ctx, at(4, 9, 0)),
                Err(LifecycleError::AlreadyWorking)
            ));

            let done = ClockLogic::clock_out_at(&ctx, at(4, 17, 0)).unwrap();
            settle(&ctx);
            assert_eq!(done.start_at, Some(started.with_timezone(&Utc)));
            assert_eq!(count_sessions(&ctx), 1);
            assert_eq!(remote.snapshot()[0].state, SessionState::Done);
        }
    }
}
