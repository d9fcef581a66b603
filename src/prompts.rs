//! Prompts sent to the model

use crate::output::THREAT_HEADING;

pub const SYSTEM_PROMPT: &str = "\
You are an expert in cybersecurity and threat modeling. Your task is to produce \
structured Data Flow Diagrams (DFDs) and identify the threats that apply to them.

Follow these standards:
- Identify all external entities (users, third-party services, attackers).
- Identify all processes (application components, APIs, services).
- Identify all data stores (databases, file storage, logs).
- Identify all data flows between entities, processes and stores.
- Group elements under explicit trust boundaries using Mermaid subgraphs.
- Draw external entities as ([rounded rectangles]) styled with a dashed border,
  processes as ((circles)) and data stores as [(cylinders)].
- Apply STRIDE (Spoofing, Tampering, Repudiation, Information Disclosure,
  Denial of Service, Elevation of Privilege) to every data flow and process.

When the user references a code repository, call the codebase_tree tool with its \
link and base the components of the diagram on the returned tree.

Your answer must contain, in this order:
1. A runnable Mermaid code block (```mermaid ... ```) with a flowchart.
2. The heading `### Threat Analysis (STRIDE)` on its own line.
3. A Markdown table with the columns Element, STRIDE category, Threat description, Mitigation.
";

/// Builds the user prompt for `use_case`, optionally naming a repository to inspect
pub fn user_prompt(use_case: &str, repository: Option<&str>) -> String {
    let mut prompt = format!(
        "Generate a Data Flow Diagram (DFD) in Mermaid syntax for the following system use case.\n\n\
         UseCase: {}\n",
        use_case.trim()
    );

    if let Some(repo) = repository {
        prompt.push_str(&format!(
            "\nCode repository: {}\nUse the codebase_tree tool on this repository to ground the \
             diagram in its actual architecture.\n",
            repo.trim()
        ));
    }

    prompt.push_str(&format!(
        "\nRequirements:\n\
         1. Identify external entities, processes and data stores.\n\
         2. Show all data flows with descriptive labels.\n\
         3. Group elements under trust boundaries (e.g. Internet, Application, External Services).\n\
         4. After the diagram, write the heading `{}` followed by a Markdown table with the \
         columns Element, STRIDE category, Threat description, Mitigation.\n",
        THREAT_HEADING
    ));

    prompt
}
