//! In-memory bridge and scheduler used by the flow tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_chain::{BridgeFuture, ChainError, MetadataBridge};
use portal_protocol::envelope::{Request, Response};
use portal_protocol::messages::DownloadBlockResponse;
use portal_protocol::types::{Endpoint, FileMeta, FileRecord};
use portal_scheduler::{Dialer, SchedulerConnection, SchedulerError};

/// Observable side effects, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ListSchedulers,
    RecordMeta,
    FileInfo,
    ListFiles,
    Delete,
    Dial,
    Call,
    Close,
}

pub type Log = Arc<Mutex<Vec<Event>>>;

fn push(log: &Log, event: Event) {
    log.lock().unwrap().push(event);
}

fn rpc_error(message: &str) -> ChainError {
    ChainError::Rpc {
        code: 1,
        message: message.to_string(),
    }
}

pub struct MockBridge {
    log: Log,
    schedulers: Vec<Endpoint>,
    recorded: Mutex<Option<FileMeta>>,
    record_error: Option<String>,
    files: HashMap<String, FileRecord>,
    delete_error: Option<String>,
}

impl MockBridge {
    pub fn with_schedulers(addrs: &[&str]) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            schedulers: addrs.iter().map(|a| Endpoint::new(*a)).collect(),
            recorded: Mutex::new(None),
            record_error: None,
            files: HashMap::new(),
            delete_error: None,
        }
    }

    pub fn failing_record(mut self, message: &str) -> Self {
        self.record_error = Some(message.into());
        self
    }

    pub fn with_file(mut self, record: FileRecord) -> Self {
        self.files.insert(record.id.clone(), record);
        self
    }

    pub fn failing_delete(mut self, message: &str) -> Self {
        self.delete_error = Some(message.into());
        self
    }

    pub fn log(&self) -> Log {
        self.log.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    pub fn recorded_meta(&self) -> Option<FileMeta> {
        self.recorded.lock().unwrap().clone()
    }
}

impl MetadataBridge for MockBridge {
    fn list_schedulers(&self) -> BridgeFuture<'_, Vec<Endpoint>> {
        push(&self.log, Event::ListSchedulers);
        let schedulers = self.schedulers.clone();
        Box::pin(async move { Ok(schedulers) })
    }

    fn record_file_meta<'a>(&'a self, meta: &'a FileMeta) -> BridgeFuture<'a, String> {
        push(&self.log, Event::RecordMeta);
        let result = match &self.record_error {
            Some(msg) => Err(rpc_error(msg)),
            None => {
                *self.recorded.lock().unwrap() = Some(meta.clone());
                Ok("0xfeed".to_string())
            }
        };
        Box::pin(async move { result })
    }

    fn file_info<'a>(&'a self, file_id: &'a str) -> BridgeFuture<'a, FileRecord> {
        push(&self.log, Event::FileInfo);
        let result = self
            .files
            .get(file_id)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(file_id.to_string()));
        Box::pin(async move { result })
    }

    fn list_files(&self) -> BridgeFuture<'_, Vec<String>> {
        push(&self.log, Event::ListFiles);
        let mut ids: Vec<String> = self.files.keys().cloned().collect();
        ids.sort();
        Box::pin(async move { Ok(ids) })
    }

    fn delete_file<'a>(&'a self, _file_id: &'a str) -> BridgeFuture<'a, ()> {
        push(&self.log, Event::Delete);
        let result = match &self.delete_error {
            Some(msg) => Err(rpc_error(msg)),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

/// Scripted scheduler reaction to one call.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Response),
    Timeout,
}

pub fn ok_reply() -> Reply {
    Reply::Ok(Response::error(0, 0, ""))
}

/// Successful download reply carrying one block.
pub fn block_reply(block_num: u32, blocks: u32, data: &[u8]) -> Reply {
    let payload = DownloadBlockResponse {
        block_num,
        blocks,
        data: data.to_vec(),
    };
    Reply::Ok(Response::ok(0, &payload).unwrap())
}

#[derive(Clone)]
struct Shared {
    log: Log,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Request>>>,
    closed: Arc<AtomicBool>,
    check_file: Option<PathBuf>,
    file_seen: Arc<Mutex<Option<bool>>>,
}

pub struct MockDialer {
    shared: Shared,
    dialed: Mutex<Vec<String>>,
}

impl MockDialer {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            shared: Shared {
                log: Arc::new(Mutex::new(Vec::new())),
                replies: Arc::new(Mutex::new(replies.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(AtomicBool::new(false)),
                check_file: None,
                file_seen: Arc::new(Mutex::new(None)),
            },
            dialed: Mutex::new(Vec::new()),
        }
    }

    /// Records events into another log (usually the bridge's).
    pub fn sharing_log(mut self, log: Log) -> Self {
        self.shared.log = log;
        self
    }

    /// Notes whether `path` exists when the first call is made.
    pub fn checking_file(mut self, path: PathBuf) -> Self {
        self.shared.check_file = Some(path);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn dialed(&self) -> Vec<String> {
        self.dialed.lock().unwrap().clone()
    }

    pub fn closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    pub fn file_seen_at_first_call(&self) -> Option<bool> {
        *self.shared.file_seen.lock().unwrap()
    }
}

pub struct MockConnection {
    endpoint: Endpoint,
    shared: Shared,
}

impl SchedulerConnection for MockConnection {
    fn call(
        &mut self,
        request: Request,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Response, SchedulerError>> + Send + '_>> {
        push(&self.shared.log, Event::Call);
        if let Some(path) = &self.shared.check_file {
            let mut seen = self.shared.file_seen.lock().unwrap();
            if seen.is_none() {
                *seen = Some(path.exists());
            }
        }
        self.shared.requests.lock().unwrap().push(request);
        let result = match self.shared.replies.lock().unwrap().pop_front() {
            Some(Reply::Ok(resp)) => Ok(resp),
            Some(Reply::Timeout) => Err(SchedulerError::Timeout),
            None => Err(SchedulerError::Closed),
        };
        Box::pin(async move { result })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        push(&self.shared.log, Event::Close);
        self.shared.closed.store(true, Ordering::SeqCst);
        Box::pin(async {})
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Dialer for MockDialer {
    type Connection = MockConnection;

    fn dial<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<MockConnection, SchedulerError>> + Send + 'a>> {
        push(&self.shared.log, Event::Dial);
        self.dialed
            .lock()
            .unwrap()
            .push(endpoint.address().to_string());
        let conn = MockConnection {
            endpoint: endpoint.clone(),
            shared: self.shared.clone(),
        };
        Box::pin(async move { Ok(conn) })
    }
}
