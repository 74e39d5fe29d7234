use clap::{Args, Subcommand};

pub mod get;
pub mod put;
pub mod rm;

use crate::cli::op::Op;
use objects_service::http_server::api::objects::DeleteObjectRequest;

crate::command_enum! {
    (Put, put::Put),
    (Get, get::Get),
    (Rm, DeleteObjectRequest),
}

// Rename the generated Command to ObjectCommand for clarity
pub type ObjectCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Object {
    #[command(subcommand)]
    pub command: ObjectCommand,
}

#[async_trait::async_trait]
impl Op for Object {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
