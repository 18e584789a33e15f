//! 채널 이름 단위의 실시간 브로드캐스트 허브
//!
//! 채널마다 `broadcast::Sender` 하나를 두고, 커넥션은 채널에 입장할 때 `Receiver`를 받는다.
//! 같은 채널 안에서는 `publish` 호출이 끝난 순서대로 모든 구독자에게 전달된다.
//! 재전송/유실 복구는 하지 않는다. 늦게 입장한 구독자는 이전 메시지를 HTTP 조회로 받는다.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::dto::{ServerEvent, StatusEvent};

#[derive(Clone)]
pub struct ChatHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<ServerEvent>>>>,
    capacity: usize,
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// 락을 쥔 채로 구독까지 마쳐서 그 사이 `prune`이 채널을 지우지 못하게 한다.
    async fn subscribe(
        &self,
        channel: &str,
    ) -> (broadcast::Sender<ServerEvent>, broadcast::Receiver<ServerEvent>) {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        let rx = tx.subscribe();
        (tx, rx)
    }

    /// 채널을 구독하고 입장 알림을 입장자 포함 전체에 브로드캐스트
    pub async fn join(
        &self,
        channel: &str,
        display_name: &str,
    ) -> broadcast::Receiver<ServerEvent> {
        let (tx, rx) = self.subscribe(channel).await;

        let delivered = tx
            .send(ServerEvent::Status(StatusEvent::joined(display_name)))
            .unwrap_or(0);
        debug!(channel, display_name, delivered, "joined chat channel");

        rx
    }

    /// 채널의 현재 구독자 전체에 이벤트 전송. 전달된 구독자 수를 반환한다.
    pub async fn publish(&self, channel: &str, event: ServerEvent) -> usize {
        let channels = self.channels.read().await;
        match channels.get(channel) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// 구독자가 남지 않은 채널 정리
    pub async fn prune(&self, channel: &str) {
        let mut channels = self.channels.write().await;
        if channels
            .get(channel)
            .is_some_and(|tx| tx.receiver_count() == 0)
        {
            channels.remove(channel);
            debug!(channel, "removed idle chat channel");
        }
    }

    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}
