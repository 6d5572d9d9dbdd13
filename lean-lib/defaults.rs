//! Built-in abbreviations used when no abbreviation file is configured.

pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
  // Greek letters
  ("alpha", "α"),
  ("beta", "β"),
  ("gamma", "γ"),
  ("delta", "δ"),
  ("epsilon", "ε"),
  ("zeta", "ζ"),
  ("eta", "η"),
  ("theta", "θ"),
  ("iota", "ι"),
  ("kappa", "κ"),
  ("lambda", "λ"),
  ("mu", "μ"),
  ("nu", "ν"),
  ("xi", "ξ"),
  ("pi", "π"),
  ("rho", "ρ"),
  ("sigma", "σ"),
  ("tau", "τ"),
  ("upsilon", "υ"),
  ("phi", "φ"),
  ("chi", "χ"),
  ("psi", "ψ"),
  ("omega", "ω"),
  // Capital Greek
  ("Gamma", "Γ"),
  ("Delta", "Δ"),
  ("Theta", "Θ"),
  ("Lambda", "Λ"),
  ("Xi", "Ξ"),
  ("Pi", "Π"),
  ("Sigma", "Σ"),
  ("Phi", "Φ"),
  ("Psi", "Ψ"),
  ("Omega", "Ω"),
  // Logic
  ("forall", "∀"),
  ("exists", "∃"),
  ("not", "¬"),
  ("and", "∧"),
  ("or", "∨"),
  ("top", "⊤"),
  ("bot", "⊥"),
  // Arrows
  ("to", "→"),
  ("lr", "↔"),
  ("ud", "↕"),
  ("r", "→"),
  ("l", "←"),
  ("u", "↑"),
  ("d", "↓"),
  ("=>", "⇒"),
  ("<=", "⇐"),
  ("iff", "↔"),
  ("mapsto", "↦"),
  ("implies", "→"),
  // Relations
  ("le", "≤"),
  ("ge", "≥"),
  ("ne", "≠"),
  ("sim", "∼"),
  ("equiv", "≡"),
  ("approx", "≈"),
  ("cong", "≅"),
  ("subset", "⊂"),
  ("supset", "⊃"),
  ("subseteq", "⊆"),
  ("supseteq", "⊇"),
  ("in", "∈"),
  ("notin", "∉"),
  ("cap", "∩"),
  ("cup", "∪"),
  // Operators
  ("times", "×"),
  ("div", "÷"),
  ("pm", "±"),
  ("mp", "∓"),
  ("cdot", "·"),
  ("circ", "∘"),
  ("oplus", "⊕"),
  ("ominus", "⊖"),
  ("otimes", "⊗"),
  ("odot", "⊙"),
  // Brackets
  ("<>", "⟨$CURSOR⟩"),
  ("<<", "⟪"),
  (">>", "⟫"),
  ("[[", "⟦"),
  ("]]", "⟧"),
  ("norm", "‖$CURSOR‖"),
  ("floor", "⌊$CURSOR⌋"),
  ("ceil", "⌈$CURSOR⌉"),
  // Other
  ("inf", "∞"),
  ("int", "∫"),
  ("partial", "∂"),
  ("nabla", "∇"),
  ("sum", "∑"),
  ("prod", "∏"),
  ("sqcup", "⊔"),
  ("sqcap", "⊓"),
  ("emptyset", "∅"),
  ("N", "ℕ"),
  ("Z", "ℤ"),
  ("Q", "ℚ"),
  ("R", "ℝ"),
  ("C", "ℂ"),
];
