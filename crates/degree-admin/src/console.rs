//! # Admin Console
//!
//! Builds one [`ResourceListController`] per admin screen, all sharing a
//! single [`ApiClient`], and wires the side actions (council decisions,
//! role assignment) through the owning screen's controller so they report and
//! refresh like any other mutation.
//!
//! ```rust,no_run
//! use degree_admin::console::AdminConsole;
//! use degree_admin::api::ListQuery;
//! use degree_admin::model::{AcademicProgram, FacultyId};
//! use degree_admin::settings::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let console = AdminConsole::from_settings(&Settings::default())?;
//!
//!     console.programs.load(ListQuery::default().with_status("active")).await;
//!     console.programs.apply_filter(Some(AcademicProgram::of_faculty(FacultyId(2))));
//!     for program in console.programs.collection().visible() {
//!         println!("{program}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Screens are independent: each controller owns its own collection, notice
//! and load tickets. Dropping the console tears all of them down.

use crate::api::{ApiClient, CouncilClient, HttpSource, UserRoleClient};
use crate::model::*;
use crate::settings::Settings;
use list_controller::{ApiError, Mutation, ResourceListController};
use std::time::Duration;

macro_rules! admin_screens {
    ($($field:ident: $ty:ident => $path:literal, required [$($req:literal),*];)*) => {
        paste::paste! {
            $(
                #[doc = "Controller of the `" $path "` screen."]
                pub type [<$ty Controller>] = ResourceListController<$ty, HttpSource<$ty>>;
            )*

            /// Every admin screen's controller.
            pub struct AdminConsole {
                $(pub $field: [<$ty Controller>],)*
                client: ApiClient,
            }

            impl AdminConsole {
                pub fn new(client: ApiClient, notice_ttl: Duration) -> Self {
                    Self {
                        $(
                            $field: ResourceListController::new(HttpSource::new(client.clone(), $path))
                                .with_required_fields({
                                    let fields: &[&str] = &[$($req),*];
                                    fields.iter().copied()
                                })
                                .with_notice_ttl(notice_ttl),
                        )*
                        client,
                    }
                }
            }
        }
    };
}

admin_screens! {
    faculties: Faculty => "faculties", required ["name", "code"];
    programs: AcademicProgram => "programs", required ["name", "code", "facultyId"];
    modalities: DegreeModality => "modalities", required ["name"];
    program_modalities: ProgramModality => "program-modalities", required ["programId", "modalityId"];
    documents: RequiredDocument => "required-documents", required ["name", "modalityId"];
    requirements: Requirement => "requirements", required ["name", "modalityId"];
    roles: Role => "roles", required ["name"];
    permissions: Permission => "permissions", required ["code"];
    users: User => "users", required ["firstName", "lastName", "email"];
    cancellations: CancellationRequest => "cancellation-requests", required ["reason"];
}

impl AdminConsole {
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::new(settings)?, settings.notice_ttl()))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Record the council's decision and refresh the cancellations screen.
    pub async fn decide_cancellation(
        &self,
        request: &CancellationRequest,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<(), ApiError> {
        let council = CouncilClient::new(self.client.clone());
        let body = CouncilDecision { decision, comment };
        self.cancellations
            .run_mutation(
                Mutation::Custom(decision.done_label()),
                council.decide(request.id, &body),
            )
            .await
    }

    /// Grant `role` to `user` and refresh the users screen.
    pub async fn assign_role(&self, user: &User, role: RoleId) -> Result<(), ApiError> {
        let roles = UserRoleClient::new(self.client.clone());
        self.users
            .run_mutation(Mutation::Custom("role assigned"), roles.assign_role(user.id, role))
            .await
    }

    /// Take `role` away from `user` and refresh the users screen.
    pub async fn revoke_role(&self, user: &User, role: RoleId) -> Result<(), ApiError> {
        let roles = UserRoleClient::new(self.client.clone());
        self.users
            .run_mutation(Mutation::Custom("role revoked"), roles.revoke_role(user.id, role))
            .await
    }
}
