use super::{form::GeneratorForm, Route};
use colored::*;

pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub struct PricingTier {
    pub name: &'static str,
    /// Monthly price in BRL. `None` is the free tier.
    pub monthly_price: Option<u32>,
    pub perks: &'static [&'static str],
    pub call_to_action: &'static str,
    pub highlighted: bool,
}

pub const STATS: [(&str, &str); 4] = [
    ("10K+", "Ilustrações Criadas"),
    ("500+", "Cidades Disponíveis"),
    ("98%", "Satisfação dos Usuários"),
    ("24/7", "Disponibilidade"),
];

pub const FEATURES: [Feature; 6] = [
    Feature {
        icon: "✨",
        title: "Design Único",
        description: "Cada cidade é representada com marcos icônicos e características únicas",
    },
    Feature {
        icon: "⚡",
        title: "Geração Instantânea",
        description: "Obtenha sua ilustração em segundos com tecnologia de IA de ponta",
    },
    Feature {
        icon: "🎨",
        title: "Estilo Isométrico",
        description: "Visual moderno e profissional em perspectiva isométrica 3D",
    },
    Feature {
        icon: "🌍",
        title: "Global",
        description: "Suporte para cidades de todo o mundo com precisão geográfica",
    },
    Feature {
        icon: "🎯",
        title: "Personalizável",
        description: "Adapte as ilustrações às suas necessidades e preferências",
    },
    Feature {
        icon: "💎",
        title: "Alta Resolução",
        description: "Imagens em qualidade profissional prontas para impressão",
    },
];

pub const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        quote: "Incrível como a IA consegue capturar a essência de cada cidade. Usei para um projeto de marketing e o resultado foi perfeito!",
        author: "Maria Costa",
        role: "Designer Gráfico",
    },
    Testimonial {
        quote: "A velocidade de geração é impressionante. Em segundos tenho uma ilustração profissional pronta para usar.",
        author: "João Silva",
        role: "Desenvolvedor",
    },
    Testimonial {
        quote: "Perfeito para apresentações e materiais de marketing. A qualidade das ilustrações superou minhas expectativas.",
        author: "Ana Santos",
        role: "Gerente de Marketing",
    },
];

pub const PRICING: [PricingTier; 3] = [
    PricingTier {
        name: "Básico",
        monthly_price: None,
        perks: &[
            "5 ilustrações por mês",
            "Resolução padrão",
            "Cidades populares",
            "Suporte por email",
        ],
        call_to_action: "Começar Grátis",
        highlighted: false,
    },
    PricingTier {
        name: "Profissional",
        monthly_price: Some(29),
        perks: &[
            "Ilustrações ilimitadas",
            "Alta resolução",
            "Todas as cidades",
            "Suporte prioritário",
            "Download em múltiplos formatos",
        ],
        call_to_action: "Assinar Agora",
        highlighted: true,
    },
    PricingTier {
        name: "Empresarial",
        monthly_price: Some(99),
        perks: &[
            "Tudo do Profissional",
            "API personalizada",
            "Suporte dedicado",
            "Customizações avançadas",
            "SLA garantido",
        ],
        call_to_action: "Falar com Vendas",
        highlighted: false,
    },
];

/// Landing page: static marketing sections plus its own quick generator form.
pub struct HomeView {
    form: GeneratorForm,
}

impl HomeView {
    pub fn new(form: GeneratorForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> &GeneratorForm {
        &self.form
    }

    pub fn render(&self) -> String {
        [
            render_hero(),
            render_stats(),
            render_features(),
            render_testimonials(),
            render_call_to_action(),
            render_pricing(),
        ]
        .join("\n\n")
    }

    /// The "Experimentar Grátis" button: jump straight to the plans.
    pub fn scroll_to_pricing(&self) -> String {
        render_pricing()
    }

    /// Every plan button leads to the generator page.
    pub fn choose_plan(&self, tier: &str) -> Route {
        log::debug!("Plan '{}' selected, navigating to generator", tier);
        Route::Generator
    }
}

fn section_title(title: &str, subtitle: &str) -> String {
    format!("{}\n{}", title.bold().underline(), subtitle.bright_black())
}

fn render_hero() -> String {
    format!(
        "{}\n{}\n{}\n{}",
        "IsoScape".bright_cyan().bold(),
        "Transforme qualquer cidade em uma obra de arte isométrica".bold(),
        "Crie ilustrações 3D únicas e personalizadas de cidades usando inteligência artificial. \
         Perfeito para apresentações, marketing e projetos criativos.",
        "🤖 IA Avançada   ⚡ Geração Rápida   💎 Alta Qualidade".bright_black()
    )
}

fn render_stats() -> String {
    STATS
        .iter()
        .map(|(value, label)| format!("{} {}", value.bright_cyan().bold(), label))
        .collect::<Vec<_>>()
        .join("   ")
}

fn render_features() -> String {
    let mut out = section_title(
        "Por que escolher IsoScape?",
        "Tecnologia de ponta para criar ilustrações únicas",
    );
    for feature in FEATURES.iter() {
        out.push_str(&format!(
            "\n {} {} - {}",
            feature.icon,
            feature.title.bold(),
            feature.description
        ));
    }
    out
}

fn render_testimonials() -> String {
    let mut out = section_title(
        "O que nossos usuários dizem",
        "Depoimentos de quem já experimentou",
    );
    for testimonial in TESTIMONIALS.iter() {
        out.push_str(&format!(
            "\n ⭐⭐⭐⭐⭐ \"{}\"\n    {}, {}",
            testimonial.quote.italic(),
            testimonial.author.bold(),
            testimonial.role
        ));
    }
    out
}

fn render_call_to_action() -> String {
    format!(
        "{}\n{}\n{}",
        "Pronto para começar?".bold(),
        "Crie sua primeira ilustração isométrica agora mesmo, sem necessidade de cadastro",
        "[ Experimentar Grátis ]  isoscape home --pricing".green()
    )
}

fn render_pricing() -> String {
    let mut out = section_title("Planos e Preços", "Escolha o plano ideal para suas necessidades");
    for tier in PRICING.iter() {
        let price = match tier.monthly_price {
            Some(amount) => format!("R$ {}/mês", amount),
            None => "Grátis".to_string(),
        };
        let badge = if tier.highlighted {
            format!(" {}", "Mais Popular".black().on_bright_cyan())
        } else {
            String::new()
        };
        out.push_str(&format!("\n {} {}{}", tier.name.bold(), price, badge));
        for perk in tier.perks {
            out.push_str(&format!("\n   ✓ {}", perk));
        }
        out.push_str(&format!(
            "\n   [ {} ]  isoscape generate <cidade>",
            tier.call_to_action
        ));
    }
    out
}
