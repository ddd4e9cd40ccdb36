use serde::{Deserialize, Serialize};

const CITY_PLACEHOLDER: &str = "[CITY]";

const ISOMETRIC_MINIATURE: &str = "
CITY = [CITY]

Crie uma cena isométrica em miniatura 3D no estilo cartoon, vista em ângulo de 45°,
representando de forma clara a cidade de [CITY]. Inclua marcos e atrações turísticas icônicas.

Use texturas suaves e refinadas, com materiais PBR realistas, iluminação natural delicada
e sombras suaves, refletindo as condições climáticas atuais da cidade para criar uma atmosfera imersiva.
Mantenha a composição limpa e minimalista, com fundo em cor sólida.

No topo central da imagem, coloque o título \"[CITY]\" em texto médio e negrito, podendo sobrepor levemente o topo das edificações.

A imagem deve ter proporção quadrada, 1080 × 1080 pixels.
";

const FUTURISTIC_SKYLINE: &str = "Create a colorful, futuristic isometric illustration of the city of [CITY]. \
Highlight its skyline, iconic landmarks, and coastal or geographic context if applicable. \
Render in high detail with soft lighting.";

/// Natural-language instruction with a `[CITY]` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::isometric_miniature()
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The cartoon miniature scene used by the generator page.
    pub fn isometric_miniature() -> Self {
        Self::new(ISOMETRIC_MINIATURE)
    }

    /// Shorter English instruction, kept for the landing-page quick form.
    pub fn futuristic_skyline() -> Self {
        Self::new(FUTURISTIC_SKYLINE)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Replaces every placeholder with `city`. The city is expected to be trimmed already.
    pub fn render(&self, city: &str) -> String {
        self.template.replace(CITY_PLACEHOLDER, city)
    }
}
