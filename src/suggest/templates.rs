//! Static template pools for locally generated rewrite suggestions.
//!
//! Pools are keyed by (language, tone); English additionally carries two
//! context pools that get unioned in for specific message types. Every base
//! pool is larger than the history window so repetition stays avoidable.

use super::ContextBucket;

pub const EN_CALM: &[&str] = &[
    "I understand your perspective, and I'd like to discuss this calmly.",
    "Let's take a moment to find common ground here.",
    "I hear what you're saying. Can we talk about this peacefully?",
    "I appreciate you sharing your thoughts. Let me respond thoughtfully.",
    "I'd like to address this in a calm and respectful way.",
    "Let's pause and approach this with understanding.",
    "I value our communication. Can we discuss this gently?",
    "I want to understand your point of view better.",
    "Thank you for expressing yourself. Let's work through this together.",
    "I'm open to hearing more. Let's keep this conversation positive.",
    "I sense there's some tension. How can we resolve this peacefully?",
    "Let's both take a breath and communicate with kindness.",
    "I respect your feelings and want to address them calmly.",
    "Perhaps we can find a solution that works for both of us.",
    "I'm here to listen and understand, not to argue.",
];

pub const EN_FIRM: &[&str] = &[
    "I need to be clear about my boundaries on this.",
    "This is not acceptable behavior, and I won't tolerate it.",
    "I'm setting a firm boundary here. Please respect it.",
    "Let me be direct: this needs to change.",
    "I expect better treatment going forward.",
    "I'm standing firm on this matter.",
    "This crosses a line that I'm not willing to accept.",
    "I need you to understand that this is non-negotiable.",
    "I'm asking you to stop this behavior immediately.",
    "Let's be clear: I deserve respect.",
    "I'm drawing the line here. This needs to end.",
    "My position on this is firm and final.",
    "I will not accept being treated this way.",
    "This is unacceptable. I require change.",
    "I'm communicating clearly: this must stop.",
];

pub const EN_EDUCATIONAL: &[&str] = &[
    "Did you know that respectful communication leads to better outcomes?",
    "Studies show that calm discussions resolve conflicts more effectively.",
    "Words can have lasting impacts. Let's choose them wisely.",
    "Effective communication starts with mutual respect.",
    "Understanding different perspectives enriches our conversations.",
    "Research suggests that empathy improves relationship quality.",
    "Constructive dialogue requires active listening from all parties.",
    "Kind words can transform difficult conversations.",
    "Communication experts recommend pausing before responding emotionally.",
    "Building trust starts with respectful exchanges.",
    "Healthy boundaries are essential for positive relationships.",
    "Emotional intelligence involves recognizing the impact of our words.",
    "Conflict resolution works best when both sides feel heard.",
    "Mindful communication can prevent misunderstandings.",
    "The way we express ourselves shapes our relationships.",
];

/// Unioned into the calm pool when the message reads as an insult.
pub const EN_APOLOGY: &[&str] = &[
    "I apologize if my words came across harshly. Let me rephrase.",
    "I'm sorry, that didn't come out right. What I meant was...",
    "Please forgive my earlier tone. Let me start over.",
    "I regret my choice of words. Let me try again more respectfully.",
];

/// Unioned into the firm pool when the message reads as a threat.
pub const EN_SAFETY: &[&str] = &[
    "I'm concerned about the direction of this conversation. Let's step back.",
    "This type of language isn't productive. I'd prefer constructive discussion.",
    "I value my safety and well-being. Let's communicate respectfully.",
    "Threatening language isn't acceptable. Please communicate appropriately.",
];

pub const FR_CALM: &[&str] = &[
    "Je comprends ton point de vue. Discutons-en calmement.",
    "Prenons un moment pour trouver un terrain d'entente.",
    "J'entends ce que tu dis. Pouvons-nous en parler paisiblement ?",
    "J'apprécie que tu partages tes pensées. Laisse-moi répondre avec réflexion.",
    "Je voudrais aborder cela de manière calme et respectueuse.",
    "Faisons une pause et approchons cela avec compréhension.",
    "Je valorise notre communication. Pouvons-nous discuter gentiment ?",
    "Je veux mieux comprendre ton point de vue.",
    "Merci de t'exprimer. Travaillons ensemble pour résoudre cela.",
    "Je suis ouvert à en entendre plus. Gardons cette conversation positive.",
    "Je sens une tension. Comment pouvons-nous résoudre cela pacifiquement ?",
    "Respirons tous les deux et communiquons avec bienveillance.",
    "Je respecte tes sentiments et veux les aborder calmement.",
    "Peut-être pouvons-nous trouver une solution qui convient à tous.",
    "Je suis là pour écouter et comprendre, pas pour argumenter.",
];

pub const FR_FIRM: &[&str] = &[
    "Je dois être clair sur mes limites à ce sujet.",
    "Ce comportement n'est pas acceptable et je ne le tolérerai pas.",
    "Je fixe une limite ferme ici. Veuillez la respecter.",
    "Laisse-moi être direct : cela doit changer.",
    "J'attends un meilleur traitement à l'avenir.",
    "Je reste ferme sur cette question.",
    "Cela dépasse une ligne que je ne suis pas prêt à accepter.",
    "J'ai besoin que tu comprennes que c'est non négociable.",
    "Je te demande d'arrêter ce comportement immédiatement.",
    "Soyons clairs : je mérite le respect.",
    "Je trace la ligne ici. Cela doit cesser.",
    "Ma position sur ce sujet est ferme et définitive.",
    "Je n'accepterai pas d'être traité de cette façon.",
    "C'est inacceptable. J'exige un changement.",
    "Je communique clairement : cela doit s'arrêter.",
];

pub const FR_EDUCATIONAL: &[&str] = &[
    "Savais-tu que la communication respectueuse mène à de meilleurs résultats ?",
    "Les études montrent que les discussions calmes résolvent mieux les conflits.",
    "Les mots peuvent avoir des impacts durables. Choisissons-les avec soin.",
    "Une communication efficace commence par le respect mutuel.",
    "Comprendre différentes perspectives enrichit nos conversations.",
    "La recherche suggère que l'empathie améliore la qualité des relations.",
    "Le dialogue constructif nécessite une écoute active de tous.",
    "Les mots gentils peuvent transformer les conversations difficiles.",
    "Les experts recommandent de faire une pause avant de répondre émotionnellement.",
    "Construire la confiance commence par des échanges respectueux.",
    "Des limites saines sont essentielles pour des relations positives.",
    "L'intelligence émotionnelle implique de reconnaître l'impact de nos mots.",
    "La résolution de conflits fonctionne mieux quand les deux côtés se sentent entendus.",
    "La communication consciente peut prévenir les malentendus.",
    "La façon dont nous nous exprimons façonne nos relations.",
];

pub const AR_CALM: &[&str] = &[
    "أفهم وجهة نظرك، دعنا نناقش هذا بهدوء.",
    "لنأخذ لحظة لإيجاد أرضية مشتركة.",
    "أسمع ما تقوله. هل يمكننا التحدث عن هذا بسلام؟",
    "أقدر مشاركتك لأفكارك. دعني أرد بتمعن.",
    "أود معالجة هذا بطريقة هادئة ومحترمة.",
    "لنتوقف ونتعامل مع هذا بتفهم.",
    "أقدر تواصلنا. هل يمكننا مناقشة هذا بلطف؟",
    "أريد أن أفهم وجهة نظرك بشكل أفضل.",
    "شكراً للتعبير عن نفسك. لنعمل معاً على هذا.",
    "أنا منفتح لسماع المزيد. لنحافظ على إيجابية المحادثة.",
    "أشعر ببعض التوتر. كيف يمكننا حل هذا بسلام؟",
    "لنأخذ نفساً عميقاً ونتواصل بلطف.",
    "أحترم مشاعرك وأريد معالجتها بهدوء.",
    "ربما يمكننا إيجاد حل يناسبنا جميعاً.",
    "أنا هنا للاستماع والفهم، وليس للجدال.",
];

pub const AR_FIRM: &[&str] = &[
    "أحتاج أن أكون واضحاً بشأن حدودي في هذا الأمر.",
    "هذا السلوك غير مقبول ولن أتسامح معه.",
    "أضع حداً صارماً هنا. يرجى احترامه.",
    "دعني أكون صريحاً: هذا يحتاج إلى تغيير.",
    "أتوقع معاملة أفضل في المستقبل.",
    "أقف بثبات في هذا الأمر.",
    "هذا يتجاوز خطاً لست مستعداً لقبوله.",
    "أحتاج منك أن تفهم أن هذا غير قابل للتفاوض.",
    "أطلب منك إيقاف هذا السلوك فوراً.",
    "لنكن واضحين: أستحق الاحترام.",
    "أرسم الخط هنا. هذا يجب أن ينتهي.",
    "موقفي في هذا الأمر ثابت ونهائي.",
    "لن أقبل أن أُعامل بهذه الطريقة.",
    "هذا غير مقبول. أطلب التغيير.",
    "أتواصل بوضوح: هذا يجب أن يتوقف.",
];

pub const AR_EDUCATIONAL: &[&str] = &[
    "هل تعلم أن التواصل المحترم يؤدي إلى نتائج أفضل؟",
    "تظهر الدراسات أن النقاشات الهادئة تحل النزاعات بفعالية أكبر.",
    "الكلمات يمكن أن يكون لها تأثيرات دائمة. لنختارها بحكمة.",
    "التواصل الفعال يبدأ بالاحترام المتبادل.",
    "فهم وجهات النظر المختلفة يثري محادثاتنا.",
    "تشير الأبحاث إلى أن التعاطف يحسن جودة العلاقات.",
    "الحوار البناء يتطلب الاستماع الفعال من جميع الأطراف.",
    "الكلمات اللطيفة يمكن أن تحول المحادثات الصعبة.",
    "يوصي الخبراء بالتوقف قبل الرد عاطفياً.",
    "بناء الثقة يبدأ بالتبادلات المحترمة.",
    "الحدود الصحية ضرورية للعلاقات الإيجابية.",
    "الذكاء العاطفي يتضمن التعرف على تأثير كلماتنا.",
    "حل النزاعات يعمل بشكل أفضل عندما يشعر كلا الطرفين بأنهما مسموعان.",
    "التواصل الواعي يمكن أن يمنع سوء الفهم.",
    "الطريقة التي نعبر بها عن أنفسنا تشكل علاقاتنا.",
];

pub const THREAT_KEYWORDS: &[&str] = &[
    "kill", "hurt", "destroy", "ruin", "regret", "pay for", "watch out", "threat",
];

pub const INSULT_KEYWORDS: &[&str] = &[
    "stupid", "idiot", "moron", "dumb", "fool", "hate you", "loser", "pathetic",
];

pub const ANGER_KEYWORDS: &[&str] = &[
    "angry", "furious", "mad", "pissed", "upset", "frustrated", "sick of",
];

/// Calm pool for a language, with the apology templates unioned in for
/// English insult contexts.
pub fn calm_pool(lang: &str, context: ContextBucket) -> Vec<&'static str> {
    match lang {
        "fr" => FR_CALM.to_vec(),
        "ar" | "darija" => AR_CALM.to_vec(),
        _ => {
            if context == ContextBucket::Insult {
                let mut pool = EN_CALM.to_vec();
                pool.extend_from_slice(EN_APOLOGY);
                pool
            } else {
                EN_CALM.to_vec()
            }
        }
    }
}

/// Firm pool for a language, with the safety templates unioned in for
/// English threat contexts.
pub fn firm_pool(lang: &str, context: ContextBucket) -> Vec<&'static str> {
    match lang {
        "fr" => FR_FIRM.to_vec(),
        "ar" | "darija" => AR_FIRM.to_vec(),
        _ => {
            if context == ContextBucket::Threat {
                let mut pool = EN_FIRM.to_vec();
                pool.extend_from_slice(EN_SAFETY);
                pool
            } else {
                EN_FIRM.to_vec()
            }
        }
    }
}

pub fn educational_pool(lang: &str) -> Vec<&'static str> {
    match lang {
        "fr" => FR_EDUCATIONAL.to_vec(),
        "ar" | "darija" => AR_EDUCATIONAL.to_vec(),
        _ => EN_EDUCATIONAL.to_vec(),
    }
}
