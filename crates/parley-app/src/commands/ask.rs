//! `parley ask`: one prompt, one run, no history.

use std::io::Write;
use std::sync::Arc;

use parley_ai::{builtin_tools, Agent, Message, RunConfig, RunEvent, Runner};
use parley_common::ParleyError;
use parley_config::{ParleyConfig, RunMode};

use super::{build_client, runtime};

pub fn ask(
    config: &ParleyConfig,
    prompt: &str,
    mode: RunMode,
    tools: bool,
) -> Result<(), ParleyError> {
    let runner = Runner::new(build_client(config)?);
    let mut agent = Agent::new(&config.agent.name, &config.agent.instructions)
        .with_model(&config.agent.model);
    if tools {
        agent = agent.with_tools(builtin_tools());
    }
    let input = vec![Message::user(prompt)];
    let run_config = RunConfig::default().with_max_turns(config.agent.max_turns);

    tracing::debug!(%mode, prompt, "Running single prompt");
    let ai_err = |e: parley_ai::AiError| ParleyError::Ai(e.to_string());

    match mode {
        RunMode::Blocking => {
            let result = runner.run_sync(&agent, input, &run_config).map_err(ai_err)?;
            println!("Agent Response: {}", result.final_output);
        }
        RunMode::Async => {
            let result = runtime()?
                .block_on(runner.run(&agent, input, &run_config))
                .map_err(ai_err)?;
            println!("Agent Response: {}", result.final_output);
        }
        RunMode::Streaming => {
            runtime()?.block_on(async {
                let mut run = runner.run_streamed(Arc::new(agent), input, run_config);
                print!("Agent Response: ");
                let mut stdout = std::io::stdout();
                while let Some(event) = run.next_event().await {
                    if let RunEvent::Delta(text) = event {
                        write!(stdout, "{text}")?;
                        stdout.flush()?;
                    }
                }
                println!();
                run.into_result().await.map_err(ai_err)?;
                Ok::<_, ParleyError>(())
            })?;
        }
    }
    Ok(())
}
