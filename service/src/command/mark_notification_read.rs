//! [`Command`] for marking a [`Notification`] as read.

use common::operations::Perform;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Notification;
use crate::{
    domain::notification,
    infra::{
        api::{self, MarkRead},
        Api,
    },
    Service,
};

use super::Command;

/// [`Command`] for marking a [`Notification`] of the signed-in user as read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkNotificationRead {
    /// ID of the [`Notification`] to mark.
    pub id: notification::Id,
}

impl<A, S> Command<MarkNotificationRead> for Service<A, S>
where
    A: Api<Perform<MarkRead>, Ok = (), Err = Traced<api::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkNotificationRead,
    ) -> Result<Self::Ok, Self::Err> {
        self.api()
            .execute(Perform(MarkRead(cmd.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`MarkNotificationRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),
}

#[cfg(test)]
mod spec {
    use common::DateTimeOf;
    use secrecy::SecretBox;

    use crate::{
        command::{Command as _, CreateSession},
        domain::{notification, Notification},
        infra::api::{self, memory::State},
        spec::service,
    };

    use super::{ExecutionError, MarkNotificationRead};

    fn notification(id: &str, user: &str) -> Notification {
        Notification {
            id: id.into(),
            user_id: Some(user.into()),
            kind: notification::Kind::Info,
            title: "Order shipped".into(),
            message: "Your order is on its way".into(),
            created_at: DateTimeOf::now(),
            is_read: false,
        }
    }

    #[tokio::test]
    async fn marks_own_notifications_only() {
        let api = api::Memory::new(State {
            notifications: vec![
                notification("n-1", "client-1"),
                notification("n-2", "supplier-1"),
            ],
            ..api::memory::spec::api(vec![]).snapshot().await
        });
        let svc = service(api);
        drop(
            svc.execute(CreateSession {
                email: "client-1@acme.io".parse().unwrap(),
                password: SecretBox::new(Box::new("secret".into())),
            })
            .await
            .unwrap(),
        );

        svc.execute(MarkNotificationRead { id: "n-1".into() })
            .await
            .unwrap();
        let err = svc
            .execute(MarkNotificationRead { id: "n-2".into() })
            .await
            .unwrap_err();

        let ExecutionError::Api(e) = err.as_ref();
        assert_eq!(e.status(), Some(404));
        let read = svc
            .api()
            .snapshot()
            .await
            .notifications
            .into_iter()
            .map(|n| n.is_read)
            .collect::<Vec<_>>();
        assert_eq!(read, [true, false]);
    }
}
