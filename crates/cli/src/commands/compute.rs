//! Mirrors `cmd/cloud-cli/compute.go`'s `compute` command group.

use anyhow::Result;
use clap::Subcommand;
use thecloud_sdk::compute::LaunchInstanceRequest;
use thecloud_sdk::Client;

#[derive(Debug, Subcommand)]
pub enum ComputeCommand {
    /// List all instances owned by the caller.
    List,
    /// Launch a new instance.
    Launch {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "alpine")]
        image: String,
        #[arg(short, long, default_value = "")]
        port: String,
    },
    /// Stop a running instance.
    Stop { id: String },
    /// Print an instance's stdout/stderr tail.
    Logs { id: String },
    /// Show detailed instance information.
    Show { id: String },
    /// Remove an instance and its resources.
    Rm { id: String },
}

pub async fn run(cmd: ComputeCommand, client: Client, json: bool) -> Result<()> {
    match cmd {
        ComputeCommand::List => {
            let instances = client.list_instances().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&instances)?);
            } else {
                println!("{:<10} {:<20} {:<20} {:<10} ACCESS", "ID", "NAME", "IMAGE", "STATUS");
                for inst in instances {
                    let id = &inst.id.to_string()[..8];
                    let access = access_summary(&inst.ports, &inst.status);
                    println!(
                        "{:<10} {:<20} {:<20} {:<10} {}",
                        id, inst.name, inst.image, inst.status, access
                    );
                }
            }
        }
        ComputeCommand::Launch { name, image, port } => {
            let req = LaunchInstanceRequest {
                name,
                image,
                ports: port,
                vpc_id: None,
            };
            let inst = client.launch_instance(&req).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&inst)?);
            } else {
                println!("Launched {} ({})", inst.name, inst.image);
            }
        }
        ComputeCommand::Stop { id } => {
            client.stop_instance(&id).await?;
            println!("Instance stop initiated.");
        }
        ComputeCommand::Logs { id } => {
            let logs = client.instance_logs(&id).await?;
            print!("{logs}");
        }
        ComputeCommand::Show { id } => {
            let inst = client.get_instance(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&inst)?);
            } else {
                println!("ID:           {}", inst.id);
                println!("Name:         {}", inst.name);
                println!("Status:       {}", inst.status);
                println!("Image:        {}", inst.image);
                println!("Ports:        {}", inst.ports);
                println!("Created At:   {}", inst.created_at);
                println!("Version:      {}", inst.version);
                println!("Container ID: {}", inst.container_id.unwrap_or_default());
            }
        }
        ComputeCommand::Rm { id } => {
            client.terminate_instance(&id).await?;
            println!("Instance {id} removed.");
        }
    }
    Ok(())
}

/// "localhost:<host>-><container>" summary for each `host:container` pair,
/// only when the instance is running — mirrors `cmd/cloud-cli/compute.go`.
fn access_summary(ports: &str, status: &str) -> String {
    if ports.is_empty() || status != "RUNNING" {
        return "-".to_string();
    }
    ports
        .split(',')
        .filter_map(|mapping| {
            let (host, container) = mapping.split_once(':')?;
            Some(format!("localhost:{host}->{container}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
