//! Entity services: the five CRUD operations per resource collection.
//!
//! Each operation is exactly one build, one transport round-trip and one
//! parse. Services trust the shape of their input (screens validate before
//! calling) but not the outcome: every failure is returned to the caller
//! untouched.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::resource::{Places, Resource, Units, Users};
use crate::transport::{ApiConfig, HttpTransport, Transport};
use crate::types::EntityId;

pub struct EntityService<R: Resource, T: Transport> {
    client: ApiClient,
    transport: Arc<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: Transport> Clone for EntityService<R, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource, T: Transport> EntityService<R, T> {
    pub fn new(client: ApiClient, transport: Arc<T>) -> Self {
        Self {
            client,
            transport,
            _resource: PhantomData,
        }
    }

    /// GET `/{resource}`, in whatever order the service returns.
    pub async fn list(&self) -> Result<Vec<R::Record>, ApiError> {
        let response = self.transport.execute(self.client.build_list::<R>()).await?;
        self.client.parse_list::<R>(response)
    }

    pub async fn get(&self, id: EntityId) -> Result<R::Record, ApiError> {
        let response = self.transport.execute(self.client.build_get::<R>(id)).await?;
        self.client.parse_record::<R>(response)
    }

    pub async fn create(&self, input: &R::Create) -> Result<R::Record, ApiError> {
        let request = self.client.build_create::<R>(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_record::<R>(response)
    }

    pub async fn update(&self, id: EntityId, input: &R::Update) -> Result<R::Record, ApiError> {
        let request = self.client.build_update::<R>(id, input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_record::<R>(response)
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete::<R>(id)).await?;
        self.client.parse_empty(response)
    }
}

pub type UserService<T = HttpTransport> = EntityService<Users, T>;
pub type UnitService<T = HttpTransport> = EntityService<Units, T>;
pub type PlaceService<T = HttpTransport> = EntityService<Places, T>;

/// The three services over one shared client and transport.
pub struct FleetApi<T: Transport = HttpTransport> {
    pub users: UserService<T>,
    pub units: UnitService<T>,
    pub places: PlaceService<T>,
}

impl<T: Transport> Clone for FleetApi<T> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            units: self.units.clone(),
            places: self.places.clone(),
        }
    }
}

impl<T: Transport> FleetApi<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        let transport = Arc::new(transport);
        Self {
            users: EntityService::new(client.clone(), Arc::clone(&transport)),
            units: EntityService::new(client.clone(), Arc::clone(&transport)),
            places: EntityService::new(client, transport),
        }
    }
}

impl FleetApi<HttpTransport> {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::new(&config.base_url), HttpTransport::new()?))
    }
}

/// Race a call against an explicit cancellation token. A cancelled call
/// yields `ApiError::Cancelled`; the request may still reach the service.
pub async fn cancellable<F, V>(token: &CancellationToken, call: F) -> Result<V, ApiError>
where
    F: Future<Output = Result<V, ApiError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::transport::Transport;

    /// Replays canned responses and records every request it receives.
    /// Clones share both queues, so a test can keep a handle after giving
    /// the transport to a `FleetApi`.
    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        requests: Arc<Mutex<Vec<HttpRequest>>>,
        responses: Arc<Mutex<VecDeque<Result<HttpResponse, ApiError>>>>,
    }

    impl ScriptedTransport {
        pub fn reply(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(self, err: ApiError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
        }
    }
}
