//! Runs a node server over real HTTP and checks each dispatch outcome.

use std::net::{Ipv4Addr, SocketAddr};

use meridian_http_insecure::InsecureHttpServer;
use meridian_node::{Error, NodeServer, NodeServerOptions};
use meridian_roles::Broker;
use meridian_roles_mock::{
    MemoryPeerAddressSet, MockBroker, MockConsensusLog, MockDataServer, SUBSYSTEM_HEADER,
};
use meridian_router::{NodeRoles, NodeRouter, NodeRouterOptions, RoutingConfig};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use url::Url;

type Roles = NodeRoles<MockConsensusLog, MockBroker, MockDataServer>;

fn node(roles: Roles, peers: &[&str]) -> NodeServer<InsecureHttpServer, MemoryPeerAddressSet> {
    let router = NodeRouter::new(NodeRouterOptions {
        config: RoutingConfig::default(),
        peers: MemoryPeerAddressSet::new(peers.iter().map(|p| Url::parse(p).unwrap()).collect()),
        roles,
    })
    .unwrap();

    NodeServer::new(NodeServerOptions {
        http_server: InsecureHttpServer::new(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))),
        router,
    })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_data_node_over_http() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let node = node(Roles::Data(MockDataServer::new()), &["http://b2:8090"]);
    let handle = node.start().await.unwrap();
    let addr = node.local_addr().unwrap();
    let client = client();

    let data = client
        .get(format!("http://{addr}/query"))
        .send()
        .await
        .unwrap();
    assert_eq!(data.status(), StatusCode::OK);
    assert_eq!(data.headers()[SUBSYSTEM_HEADER], "data");

    let redirect = client
        .get(format!("http://{addr}/messaging/topics"))
        .send()
        .await
        .unwrap();
    assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        redirect.headers()[LOCATION],
        "http://b2:8090/messaging/topics"
    );

    let consensus = client
        .get(format!("http://{addr}/raft/vote"))
        .send()
        .await
        .unwrap();
    assert_eq!(consensus.status(), StatusCode::SERVICE_UNAVAILABLE);

    node.shutdown().await;
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_broker_node_over_http() {
    let broker = MockBroker::new(MockConsensusLog::new());
    let node = node(Roles::Broker(broker.clone()), &["http://b2:8090"]);
    let handle = node.start().await.unwrap();
    let addr = node.local_addr().unwrap();
    let client = client();

    let messaging = client
        .post(format!("http://{addr}/messaging/messages"))
        .send()
        .await
        .unwrap();
    assert_eq!(messaging.status(), StatusCode::OK);
    assert_eq!(messaging.headers()[SUBSYSTEM_HEADER], "broker");

    let consensus = client
        .get(format!("http://{addr}/raft/heartbeat"))
        .send()
        .await
        .unwrap();
    assert_eq!(consensus.headers()[SUBSYSTEM_HEADER], "consensus");

    assert_eq!(broker.requests_served(), 1);
    assert_eq!(broker.log().requests_served(), 1);

    node.shutdown().await;
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_start_twice_fails() {
    let node = node(Roles::Consensus(MockConsensusLog::new()), &[]);

    node.start().await.unwrap();
    let second = node.start().await;

    assert!(matches!(second, Err(Error::AlreadyStarted)));

    node.shutdown().await;
}
