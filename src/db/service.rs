use log::*;

use std::rc::Rc;
use std::cell::RefCell;
use std::time::Duration;

use tokio::time::delay_for;

use tokio_postgres::{
  connect, Client, Statement, Row, NoTls,
  types::ToSql,
};

use crate::error::*;

use super::{
  UserService,
  ProfileService,
  PostService,
};

const MAX_RETRIES: u32 = 10;
const RECONNECT_DELAY: Duration = Duration::from_millis(500);
const WAIT_DELAY: Duration = Duration::from_millis(100);

pub type RefClient = Rc<(u64, Client)>;

/// Connection state.  Every reconnect gets a new version number so
/// statements prepared on a dead connection can detect it.
#[derive(Clone)]
pub enum ClientState {
  Disconnected(u64),
  Connecting(u64),
  Connected(RefClient),
}

/// A postgres client shared by the per-collection services.  A background
/// task owns the connection and keeps reconnecting until the process stops.
#[derive(Clone)]
pub struct SharedClient {
  state: Rc<RefCell<ClientState>>,
}

impl SharedClient {
  pub fn new(url: &str) -> Self {
    let cl = Self {
      state: Rc::new(RefCell::new(ClientState::Disconnected(0))),
    };
    cl.start_client(url.to_string());
    cl
  }

  fn start_client(&self, url: String) {
    let shared_cl = self.clone();
    actix_rt::spawn(async move {
      shared_cl.run_client(url).await;
      error!("db client background task stopped.");
    });
  }

  async fn run_client(&self, url: String) {
    let mut version = 0;
    loop {
      version += 1;
      debug!("db client: ver={}: connecting", version);
      self.set_state(ClientState::Connecting(version));
      let (cl, conn) = loop {
        match connect(&url, NoTls).await {
          Ok(connected) => break connected,
          Err(e) => {
            debug!("db client: ver={}: connect error: {}", version, e);
            delay_for(RECONNECT_DELAY).await;
          },
        }
      };
      debug!("db client: ver={}: connected", version);
      self.set_state(ClientState::Connected(Rc::new((version, cl))));
      // Drive the connection until it drops.
      match conn.await {
        Err(e) => {
          debug!("db connection error: {}", e);
        },
        _ => {
          debug!("db connection closed.");
          return;
        },
      }
      self.set_state(ClientState::Disconnected(version));
      delay_for(RECONNECT_DELAY).await;
    }
  }

  pub async fn get_client(&self) -> Result<RefClient> {
    let mut retries = 0u32;
    loop {
      match self.get_state() {
        ClientState::Connected(cl) => return Ok(cl),
        ClientState::Connecting(version) | ClientState::Disconnected(version) => {
          debug!("get_client: ver={}: waiting for connection", version);
          delay_for(WAIT_DELAY).await;
        },
      }
      retries += 1;
      if retries >= MAX_RETRIES {
        return Err(Error::DisconnectedError("Failed to connect to database".to_string()));
      }
    }
  }

  /// Check whether `version` is still the live connection.
  pub fn check_version(&self, version: u64) -> bool {
    match &*self.state.borrow() {
      ClientState::Connected(ref cl) => cl.0 == version,
      _ => false,
    }
  }

  fn get_state(&self) -> ClientState {
    self.state.borrow().clone()
  }

  fn set_state(&self, state: ClientState) {
    self.state.replace(state);
  }
}

pub type RefClientStatement = Rc<ClientStatement>;

#[derive(Clone)]
pub struct ClientStatement {
  cl: RefClient,
  statement: Statement,
}

impl ClientStatement {
  pub fn get_version(&self) -> u64 {
    self.cl.0
  }

  pub fn get_cl_statement(&self) -> (&Client, &Statement) {
    (&self.cl.1, &self.statement)
  }
}

/// Prepare statement state
#[derive(Clone)]
enum StatementState {
  Init(u64),
  WaitingClient(u64),
  Preparing(u64),
  Prepared(RefClientStatement),
}

/// A prepared statement bound to a connection version.  When the shared
/// client reconnects the statement re-prepares itself on the new
/// connection.
#[derive(Clone)]
pub struct VersionedStatement {
  shared_cl: SharedClient,
  state: RefCell<StatementState>,
  query: String,
}

macro_rules! impl_statement_method {
  ($method:ident, $res_ty:ty) => {
    pub async fn $method(&self, params: &[&(dyn ToSql + Sync)]) -> Result<$res_ty> {
      let mut retries = 0;
      loop {
        let ref_statement = self.get_statement().await?;
        let (cl, statement) = ref_statement.get_cl_statement();

        match cl.$method(statement, params).await {
          Ok(res) => return Ok(res),
          Err(err) => {
            match err.code() {
              None => {
                // client-side error.
                match err.to_string().as_str() {
                  "connection closed" => {
                    retries += 1;
                    if retries >= MAX_RETRIES {
                      return Err(Error::DisconnectedError(
                        "Failed to connect to database".to_string()));
                    }
                    // connection to the DB was closed, try again.
                    info!("DB connection closed, retry query.");
                    delay_for(WAIT_DELAY).await;
                  },
                  msg => {
                    error!("Postgres error: {}, query=[[{}]]", msg, self.query);
                    return Err(err.into());
                  },
                }
              },
              Some(_) => {
                // Server-side error.
                error!("Postgres DB error: {:?}, query=[[{}]]", err, self.query);
                return Err(err.into());
              },
            }
          },
        }
      }
    }
  };
}

impl VersionedStatement {
  pub fn new(shared_cl: SharedClient, query: &str) -> Result<Self> {
    Ok(Self {
      shared_cl,
      state: RefCell::new(StatementState::Init(0)),
      query: query.to_string(),
    })
  }

  pub async fn prepare(&self) -> Result<()> {
    self.get_statement().await?;
    Ok(())
  }

  pub async fn get_statement(&self) -> Result<RefClientStatement> {
    let mut retries = 0u32;
    loop {
      match self.get_state() {
        StatementState::Init(version) => {
          self.set_state(StatementState::WaitingClient(version));
          match self.shared_cl.get_client().await {
            Ok(cl) => {
              let version = cl.0;
              self.set_state(StatementState::Preparing(version));
              match cl.1.prepare(&self.query).await {
                Ok(statement) => {
                  debug!("get_statement: ver={}: prepared", version);
                  self.set_state(StatementState::Prepared(
                    Rc::new(ClientStatement {
                      cl,
                      statement,
                    })
                  ));
                },
                Err(err) => {
                  match err.code() {
                    None => {
                      match err.to_string().as_str() {
                        "connection closed" => {
                          // retry connection.  Go back into Init state.
                          self.set_state(StatementState::Init(version));
                        },
                        msg => {
                          error!("Postgres error: {}, query=[[{}]]", msg, self.query);
                          return Err(err.into());
                        },
                      }
                    },
                    Some(_) => {
                      // Server-side error.
                      error!("Postgres DB error: {}, query=[[{}]]", err, self.query);
                      return Err(err.into());
                    },
                  }
                },
              }
            },
            Err(err) => {
              debug!("get_statement: ver={}: no client: {:?}", version, err);
              // Failed to get client connection.  Go back into Init state.
              self.set_state(StatementState::Init(version));
              return Err(err);
            }
          }
        },
        StatementState::WaitingClient(version) => {
          debug!("get_statement: ver={}: waiting for client", version);
          delay_for(WAIT_DELAY).await;
        },
        StatementState::Preparing(version) => {
          debug!("get_statement: ver={}: preparing", version);
          delay_for(WAIT_DELAY).await;
        },
        StatementState::Prepared(cl_statement) => {
          let version = cl_statement.get_version();
          if self.shared_cl.check_version(version) {
            return Ok(cl_statement);
          }
          // old version, need to reconnect, prepare statement.
          self.set_state(StatementState::Init(version));
        },
      }
      retries += 1;
      if retries >= MAX_RETRIES {
        return Err(Error::DisconnectedError("Failed to connect to database".to_string()));
      }
    }
  }

  fn get_state(&self) -> StatementState {
    self.state.borrow().clone()
  }

  fn set_state(&self, state: StatementState) {
    self.state.replace(state);
  }

  impl_statement_method!(query, Vec<Row>);
  impl_statement_method!(query_one, Row);
  impl_statement_method!(query_opt, Option<Row>);
  impl_statement_method!(execute, u64);
}

#[derive(Clone)]
pub struct DbService {
  pub shared_cl: SharedClient,
  pub user: UserService,
  pub profile: ProfileService,
  pub post: PostService,
}

impl DbService {
  pub fn new(db_url: &str) -> Result<DbService> {
    let shared_cl = SharedClient::new(db_url);

    Ok(DbService {
      user: UserService::new(shared_cl.clone())?,
      profile: ProfileService::new(shared_cl.clone())?,
      post: PostService::new(shared_cl.clone())?,
      shared_cl,
    })
  }

  pub async fn prepare(&self) -> Result<()> {
    info!("DBService: Prepare UserService.");
    self.user.prepare().await?;
    info!("DBService: Prepare ProfileService.");
    self.profile.prepare().await?;
    info!("DBService: Prepare PostService.");
    self.post.prepare().await?;

    info!("DBService: finished.");
    Ok(())
  }
}
