// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Fixed system instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "Create a Mermaid.js diagram based on the user's request. Follow these guidelines:

1. Use appropriate diagram type (flowchart TD/LR, sequence, class, etc.)
2. Keep the diagram clear and readable
3. Use meaningful node IDs and labels
4. Follow latest Mermaid.js syntax strictly
5. Avoid overly complex structures
6. Include only essential elements
7. Use proper arrow types and connections

Important: Only output the Mermaid.js code without any explanations or additional text.
Example format:
graph TD
    A[Start] --> B{Decision}
    B -->|Yes| C[Action]
    B -->|No| D[Other Action]";

/// User message embedding the free-text prompt.
pub fn user_message(prompt: &str) -> String {
    format!("Create a Mermaid.js diagram for: {prompt}. Only output the diagram code, no explanations.")
}
